use bitcrypto::SHA256D;
use chain::IndexedTransaction;
use std::cmp::Ordering;
use std::collections::HashSet;

/// A pending transaction staged for inclusion, along with the metadata the
/// queue orders by and the pool parents it still waits for.
#[derive(Debug, Clone)]
pub struct CandidateTransaction {
	pub transaction: IndexedTransaction,
	/// Fee in base units.
	pub fee: u64,
	/// Value-age weighted priority at the template height.
	pub priority: f64,
	/// Fee in base units per serialized kilobyte, truncated.
	pub fee_per_kb: u64,
	/// True when any output carries an administrative thread script.
	pub is_admin: bool,
	/// Hashes of pool transactions whose outputs this one spends. The
	/// candidate stays parked until the set drains.
	pub depends_on: HashSet<SHA256D>,
}

/// The two total orders the queue can operate under. Administrative
/// transactions sort first under either of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderingStrategy {
	/// Highest priority first, fee rate breaking ties.
	ByPriority,
	/// Highest fee rate first, priority breaking ties.
	ByFeeRate,
}

impl OrderingStrategy {
	/// Returns `Greater` when `a` should be popped before `b`.
	fn compare(self, a: &CandidateTransaction, b: &CandidateTransaction) -> Ordering {
		let admin_ordering = a.is_admin.cmp(&b.is_admin);
		if admin_ordering != Ordering::Equal {
			return admin_ordering;
		}

		let by_priority = compare_f64(a.priority, b.priority);
		let by_fee_rate = a.fee_per_kb.cmp(&b.fee_per_kb);
		match self {
			OrderingStrategy::ByPriority => by_priority.then(by_fee_rate),
			OrderingStrategy::ByFeeRate => by_fee_rate.then(by_priority),
		}
	}
}

fn compare_f64(a: f64, b: f64) -> Ordering {
	a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Binary max-heap of candidate transactions under a swappable ordering
/// strategy. `std::collections::BinaryHeap` bakes the order into the
/// element type, so a heap that re-sorts mid-drain is built by hand here.
pub struct TransactionPriorityQueue {
	strategy: OrderingStrategy,
	items: Vec<CandidateTransaction>,
}

impl TransactionPriorityQueue {
	/// New queue with space for `reserve` elements, sorting by fee rate or
	/// by priority.
	pub fn new(reserve: usize, sort_by_fee: bool) -> Self {
		TransactionPriorityQueue {
			strategy: if sort_by_fee {
				OrderingStrategy::ByFeeRate
			} else {
				OrderingStrategy::ByPriority
			},
			items: Vec::with_capacity(reserve),
		}
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	pub fn push(&mut self, candidate: CandidateTransaction) {
		self.items.push(candidate);
		self.sift_up(self.items.len() - 1);
	}

	/// Removes and returns the top candidate under the current strategy.
	pub fn pop(&mut self) -> Option<CandidateTransaction> {
		if self.items.is_empty() {
			return None;
		}

		let last = self.items.len() - 1;
		self.items.swap(0, last);
		let top = self.items.pop();
		if !self.items.is_empty() {
			self.sift_down(0);
		}
		top
	}

	/// Replaces the ordering strategy and restores the heap property in
	/// O(n) before the next extraction.
	pub fn set_strategy(&mut self, strategy: OrderingStrategy) {
		self.strategy = strategy;
		for index in (0..self.items.len() / 2).rev() {
			self.sift_down(index);
		}
	}

	fn sift_up(&mut self, mut index: usize) {
		while index > 0 {
			let parent = (index - 1) / 2;
			if self.strategy.compare(&self.items[index], &self.items[parent]) != Ordering::Greater {
				break;
			}
			self.items.swap(index, parent);
			index = parent;
		}
	}

	fn sift_down(&mut self, mut index: usize) {
		loop {
			let left = 2 * index + 1;
			if left >= self.items.len() {
				break;
			}

			let right = left + 1;
			let mut largest = index;
			if self.strategy.compare(&self.items[left], &self.items[largest]) == Ordering::Greater {
				largest = left;
			}
			if right < self.items.len() && self.strategy.compare(&self.items[right], &self.items[largest]) == Ordering::Greater {
				largest = right;
			}
			if largest == index {
				break;
			}

			self.items.swap(index, largest);
			index = largest;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{CandidateTransaction, OrderingStrategy, TransactionPriorityQueue};

	fn candidate(priority: f64, fee_per_kb: u64, is_admin: bool) -> CandidateTransaction {
		CandidateTransaction {
			transaction: Default::default(),
			fee: 0,
			priority,
			fee_per_kb,
			is_admin,
			depends_on: Default::default(),
		}
	}

	#[test]
	fn test_by_priority_order() {
		let mut queue = TransactionPriorityQueue::new(4, false);
		queue.push(candidate(10.0, 500, false));
		queue.push(candidate(50.0, 1, false));
		queue.push(candidate(30.0, 100, false));

		assert_eq!(queue.pop().unwrap().priority, 50.0);
		assert_eq!(queue.pop().unwrap().priority, 30.0);
		assert_eq!(queue.pop().unwrap().priority, 10.0);
		assert!(queue.pop().is_none());
	}

	#[test]
	fn test_by_priority_ties_break_on_fee_rate() {
		let mut queue = TransactionPriorityQueue::new(2, false);
		queue.push(candidate(10.0, 1, false));
		queue.push(candidate(10.0, 500, false));

		assert_eq!(queue.pop().unwrap().fee_per_kb, 500);
	}

	#[test]
	fn test_by_fee_rate_order() {
		let mut queue = TransactionPriorityQueue::new(3, true);
		queue.push(candidate(100.0, 10, false));
		queue.push(candidate(1.0, 900, false));
		queue.push(candidate(50.0, 300, false));

		assert_eq!(queue.pop().unwrap().fee_per_kb, 900);
		assert_eq!(queue.pop().unwrap().fee_per_kb, 300);
		assert_eq!(queue.pop().unwrap().fee_per_kb, 10);
	}

	#[test]
	fn test_admin_sorts_first_under_both_strategies() {
		for sort_by_fee in &[false, true] {
			let mut queue = TransactionPriorityQueue::new(3, *sort_by_fee);
			queue.push(candidate(1_000_000.0, 1_000_000, false));
			queue.push(candidate(0.0, 0, true));

			assert!(queue.pop().unwrap().is_admin);
		}
	}

	#[test]
	fn test_strategy_swap_reorders_queue() {
		let mut queue = TransactionPriorityQueue::new(3, false);
		queue.push(candidate(100.0, 10, false));
		queue.push(candidate(90.0, 900, false));
		queue.push(candidate(80.0, 300, false));

		assert_eq!(queue.pop().unwrap().priority, 100.0);

		queue.set_strategy(OrderingStrategy::ByFeeRate);
		assert_eq!(queue.pop().unwrap().fee_per_kb, 900);
		assert_eq!(queue.pop().unwrap().fee_per_kb, 300);
	}

	#[test]
	fn test_reinserting_popped_candidate() {
		let mut queue = TransactionPriorityQueue::new(2, false);
		queue.push(candidate(100.0, 10, false));
		queue.push(candidate(90.0, 900, false));

		let popped = queue.pop().unwrap();
		assert_eq!(popped.priority, 100.0);

		queue.set_strategy(OrderingStrategy::ByFeeRate);
		queue.push(popped);
		assert_eq!(queue.pop().unwrap().fee_per_kb, 900);
		assert_eq!(queue.pop().unwrap().fee_per_kb, 10);
	}
}
