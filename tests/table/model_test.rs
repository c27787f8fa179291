/*!
 * Model-Based Table Tests
 * Random operation sequences checked against a plain reference model
 */

use proptest::prelude::*;
use rfd_table::{DescriptorTable, INVALID_FD, INVALID_RFD, INVALID_SOCKET};
use std::collections::{HashMap, HashSet, VecDeque};

#[derive(Debug, Clone)]
enum Op {
    RegisterSocket(u64),
    RegisterFd(i32),
    UnregisterSocket(u64),
    Release(i32),
    CloseSocket(u64),
    UnregisterFd(i32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u64..8).prop_map(Op::RegisterSocket),
        2 => (0i32..8).prop_map(Op::RegisterFd),
        1 => (0u64..8).prop_map(Op::UnregisterSocket),
        2 => (-1i32..16).prop_map(Op::Release),
        1 => (0u64..8).prop_map(Op::CloseSocket),
        1 => (0i32..8).prop_map(Op::UnregisterFd),
    ]
}

#[derive(Default)]
struct Model {
    socket_to_rfd: HashMap<u64, i32>,
    fd_to_rfd: HashMap<i32, i32>,
    records: HashMap<i32, u64>,
    rfd_to_fd: HashMap<i32, i32>,
    pool: VecDeque<i32>,
    next: i32,
}

impl Model {
    fn new() -> Self {
        Self {
            next: 3,
            ..Default::default()
        }
    }

    fn allocate(&mut self) -> i32 {
        self.pool.pop_front().unwrap_or_else(|| {
            self.next += 1;
            self.next - 1
        })
    }

    fn release(&mut self, rfd: i32) {
        if let Some(socket) = self.records.remove(&rfd) {
            if self.socket_to_rfd.get(&socket) == Some(&rfd) {
                self.socket_to_rfd.remove(&socket);
            }
            self.pool.push_back(rfd);
        }
    }

    fn apply(&mut self, op: &Op) -> Option<i32> {
        match *op {
            Op::RegisterSocket(s) => {
                if self.socket_to_rfd.contains_key(&s) {
                    return Some(INVALID_RFD);
                }
                let rfd = self.allocate();
                self.socket_to_rfd.insert(s, rfd);
                self.records.insert(rfd, s);
                Some(rfd)
            }
            Op::RegisterFd(fd) => {
                if let Some(&rfd) = self.fd_to_rfd.get(&fd) {
                    return Some(rfd);
                }
                let rfd = self.allocate();
                self.fd_to_rfd.insert(fd, rfd);
                self.rfd_to_fd.insert(rfd, fd);
                Some(rfd)
            }
            Op::UnregisterSocket(s) => {
                self.socket_to_rfd.remove(&s);
                None
            }
            Op::Release(rfd) => {
                self.release(rfd);
                None
            }
            Op::CloseSocket(s) => {
                if let Some(&rfd) = self.socket_to_rfd.get(&s) {
                    self.release(rfd);
                }
                None
            }
            Op::UnregisterFd(fd) => {
                if let Some(rfd) = self.fd_to_rfd.remove(&fd) {
                    self.rfd_to_fd.remove(&rfd);
                    self.pool.push_back(rfd);
                }
                None
            }
        }
    }
}

fn apply_to_table(table: &DescriptorTable, op: &Op) -> Option<i32> {
    match *op {
        Op::RegisterSocket(s) => Some(table.register_socket(s)),
        Op::RegisterFd(fd) => Some(table.register_native_fd(fd)),
        Op::UnregisterSocket(s) => {
            table.unregister_socket(s);
            None
        }
        Op::Release(rfd) => {
            table.release_rfd(rfd);
            None
        }
        Op::CloseSocket(s) => {
            table.close_socket(s);
            None
        }
        Op::UnregisterFd(fd) => {
            table.unregister_native_fd(fd);
            None
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn table_matches_model(ops in prop::collection::vec(op_strategy(), 1..200)) {
        let table = DescriptorTable::new();
        let mut model = Model::new();

        for op in &ops {
            let expected = model.apply(op);
            let actual = apply_to_table(&table, op);
            prop_assert_eq!(actual, expected, "op {:?}", op);

            if let Some(rfd) = actual {
                prop_assert!(rfd == INVALID_RFD || rfd >= 3);
            }

            for rfd in -1..model.next + 1 {
                let socket = model.records.get(&rfd).copied().unwrap_or(INVALID_SOCKET);
                let fd = model.rfd_to_fd.get(&rfd).copied().unwrap_or(INVALID_FD);
                prop_assert_eq!(table.resolve_socket(rfd), socket);
                prop_assert_eq!(table.resolve_native_fd(rfd), fd);
            }

            for (&socket, &rfd) in &model.socket_to_rfd {
                prop_assert_eq!(table.lookup_socket_rfd(socket), rfd);
            }

            let stats = table.stats();
            prop_assert_eq!(stats.recycled_available, model.pool.len());
            prop_assert_eq!(stats.live_sockets, model.socket_to_rfd.len());
            prop_assert_eq!(stats.live_fds, model.fd_to_rfd.len());
        }

        // No RFD is live on both sides or sitting in the pool while live
        let live_sockets: HashSet<_> = model.records.keys().copied().collect();
        let live_fds: HashSet<_> = model.rfd_to_fd.keys().copied().collect();
        let pooled: HashSet<_> = model.pool.iter().copied().collect();
        prop_assert!(live_sockets.is_disjoint(&live_fds));
        prop_assert!(live_sockets.is_disjoint(&pooled));
        prop_assert!(live_fds.is_disjoint(&pooled));
        prop_assert_eq!(pooled.len(), model.pool.len());
    }
}
