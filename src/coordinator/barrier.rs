//! Turn barrier for boards sharing one opponent cycle.
//!
//! Every board's interpreter is a participant. A participant either arrives
//! (end of turn, then waits) or departs (its program finished). Whoever
//! completes the set, by arriving last or by departing while everyone else
//! has arrived, becomes the leader: it runs the opponent cycle and then
//! releases the waiters.

use std::cell::RefCell;
use tokio::sync::Notify;
use tracing::{debug, trace};

#[derive(Debug, Default)]
struct BarrierState {
    participants: usize,
    arrived: usize,
    generation: u64,
}

/// What an arriving participant has to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    /// Run the opponent cycle, then call [`TurnBarrier::release`].
    Leader,
    /// Wait for the given generation to end.
    Follower(u64),
}

/// Single-threaded barrier; never shared across OS threads.
#[derive(Debug, Default)]
pub struct TurnBarrier {
    state: RefCell<BarrierState>,
    notify: Notify,
}

impl TurnBarrier {
    /// Creates an empty barrier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a round with `participants` boards.
    pub fn open(&self, participants: usize) {
        let mut state = self.state.borrow_mut();
        state.participants = participants;
        state.arrived = 0;
        debug!(participants, generation = state.generation, "Barrier opened");
    }

    /// Participants still running.
    pub fn participants(&self) -> usize {
        self.state.borrow().participants
    }

    /// Registers an end-of-turn arrival.
    pub fn arrive(&self) -> Arrival {
        let mut state = self.state.borrow_mut();
        state.arrived += 1;
        trace!(arrived = state.arrived, participants = state.participants, "Arrived");
        if state.arrived >= state.participants {
            Arrival::Leader
        } else {
            Arrival::Follower(state.generation)
        }
    }

    /// Removes a finished participant. Returns true if that leaves every
    /// remaining participant waiting, making the caller the leader.
    pub fn depart(&self) -> bool {
        let mut state = self.state.borrow_mut();
        state.participants = state.participants.saturating_sub(1);
        trace!(arrived = state.arrived, participants = state.participants, "Departed");
        state.participants > 0 && state.arrived >= state.participants
    }

    /// Ends the current generation and wakes every waiter.
    pub fn release(&self) {
        {
            let mut state = self.state.borrow_mut();
            state.arrived = 0;
            state.generation += 1;
            debug!(generation = state.generation, "Barrier released");
        }
        self.notify.notify_waiters();
    }

    /// Suspends until `generation` has been released.
    pub async fn wait(&self, generation: u64) {
        loop {
            let notified = self.notify.notified();
            if self.state.borrow().generation != generation {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_arrival_leads() {
        let barrier = TurnBarrier::new();
        barrier.open(3);
        assert_eq!(barrier.arrive(), Arrival::Follower(0));
        assert_eq!(barrier.arrive(), Arrival::Follower(0));
        assert_eq!(barrier.arrive(), Arrival::Leader);
        barrier.release();
        assert_eq!(barrier.arrive(), Arrival::Follower(1));
    }

    #[test]
    fn test_departure_can_complete_the_set() {
        let barrier = TurnBarrier::new();
        barrier.open(3);
        assert_eq!(barrier.arrive(), Arrival::Follower(0));
        assert!(!barrier.depart());
        assert_eq!(barrier.participants(), 2);
        assert_eq!(barrier.arrive(), Arrival::Leader);
        barrier.release();

        assert_eq!(barrier.arrive(), Arrival::Follower(1));
        assert!(barrier.depart());
        barrier.release();
        assert!(!barrier.depart());
        assert_eq!(barrier.participants(), 0);
    }

    #[tokio::test]
    async fn test_waiters_wake_on_release() {
        let barrier = TurnBarrier::new();
        barrier.open(2);
        let Arrival::Follower(generation) = barrier.arrive() else {
            panic!("first arrival should wait");
        };
        let waiter = barrier.wait(generation);
        let leader = async {
            assert_eq!(barrier.arrive(), Arrival::Leader);
            tokio::task::yield_now().await;
            barrier.release();
        };
        tokio::join!(waiter, leader);
    }
}
