// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::auth::GrantKind;

/// Per-grant request and failure tallies for one auth client.
///
/// Counters only grow. Read them through [`TicketMetrics::snapshot`].
#[derive(Debug, Default)]
pub struct TicketMetrics {
	authenticate: GrantCounters,
	refresh: GrantCounters,
}
impl TicketMetrics {
	/// Captures the current tallies.
	pub fn snapshot(&self) -> TicketMetricsSnapshot {
		TicketMetricsSnapshot {
			authentications: self.authenticate.sent.load(Ordering::Relaxed),
			refreshes: self.refresh.sent.load(Ordering::Relaxed),
			authentication_failures: self.authenticate.failed.load(Ordering::Relaxed),
			refresh_failures: self.refresh.failed.load(Ordering::Relaxed),
		}
	}

	pub(crate) fn record_sent(&self, grant: GrantKind) {
		self.counters(grant).sent.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failed(&self, grant: GrantKind) {
		self.counters(grant).failed.fetch_add(1, Ordering::Relaxed);
	}

	fn counters(&self, grant: GrantKind) -> &GrantCounters {
		match grant {
			GrantKind::Authenticate => &self.authenticate,
			GrantKind::Refresh => &self.refresh,
		}
	}
}

/// Point-in-time copy of [`TicketMetrics`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TicketMetricsSnapshot {
	/// `client_credentials` authentications sent upstream.
	pub authentications: u64,
	/// Refreshes sent upstream.
	pub refreshes: u64,
	/// Authentications that ended in an error, including store failures.
	pub authentication_failures: u64,
	/// Refreshes that ended in an error, including store failures.
	pub refresh_failures: u64,
}
impl TicketMetricsSnapshot {
	/// Failed ticket requests across both grants.
	pub const fn failures(&self) -> u64 {
		self.authentication_failures + self.refresh_failures
	}
}

#[derive(Debug, Default)]
struct GrantCounters {
	sent: AtomicU64,
	failed: AtomicU64,
}
