use crossbeam_channel::Receiver;
use tracing::trace;

use super::scan::Tally;
use crate::error::{Error, Result};

/// Field-wise sum of any number of tallies. Order does not matter.
pub fn aggregate<I>(tallies: I) -> Tally
where
    I: IntoIterator<Item = Tally>,
{
    tallies.into_iter().sum()
}

/// Folds per-chunk tallies into a grand total as they arrive.
///
/// The aggregator is the only owner of the running total; workers hand over
/// immutable tallies and never touch it.
#[derive(Debug, Clone)]
pub struct Aggregator {
    expected: usize,
    received: usize,
    total: Tally,
}

impl Aggregator {
    pub fn new(expected: usize) -> Self {
        Aggregator {
            expected,
            received: 0,
            total: Tally::default(),
        }
    }

    #[inline]
    pub fn add(&mut self, tally: Tally) {
        self.total += tally;
        self.received += 1;
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn received(&self) -> usize {
        self.received
    }

    pub fn is_complete(&self) -> bool {
        self.received >= self.expected
    }

    /// Running total so far, complete or not.
    pub fn total(&self) -> Tally {
        self.total
    }

    /// The total, provided every expected tally has been added.
    pub fn finish(self) -> Result<Tally> {
        if self.received != self.expected {
            return Err(Error::Incomplete {
                expected: self.expected,
                received: self.received,
            });
        }
        Ok(self.total)
    }

    /// Block until `expected` tallies have been received, in whatever order
    /// the workers finish. Waits indefinitely while any sender is alive; if
    /// every sender is gone before the count is reached the run is
    /// `Incomplete`.
    pub fn collect(mut self, results: &Receiver<Tally>) -> Result<Tally> {
        while !self.is_complete() {
            match results.recv() {
                Ok(tally) => {
                    self.add(tally);
                    trace!(
                        received = self.received(),
                        expected = self.expected(),
                        total = ?self.total(),
                        "collected tally"
                    );
                }
                Err(_) => break,
            }
        }
        self.finish()
    }
}
