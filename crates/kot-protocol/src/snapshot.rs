//! Categorized kitchen view returned by one poll.

use serde::{Deserialize, Serialize};

use crate::ticket::{Ticket, TicketStatus};

/// Full categorized view of the kitchen at one polling instant.
///
/// Each named bucket holds only tickets of that status; `all` holds every
/// ticket. A missing bucket deserializes as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KitchenSnapshot {
    pub pending: Vec<Ticket>,
    pub preparing: Vec<Ticket>,
    pub ready: Vec<Ticket>,
    pub served: Vec<Ticket>,
    pub cancelled: Vec<Ticket>,
    pub all: Vec<Ticket>,
}

/// Aggregate ticket counts derived from bucket lengths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketCounts {
    pub total: usize,
    pub pending: usize,
    pub preparing: usize,
    pub ready: usize,
    pub served: usize,
    pub cancelled: usize,
}

impl KitchenSnapshot {
    pub fn bucket(&self, status: TicketStatus) -> &[Ticket] {
        match status {
            TicketStatus::Pending => &self.pending,
            TicketStatus::Preparing => &self.preparing,
            TicketStatus::Ready => &self.ready,
            TicketStatus::Served => &self.served,
            TicketStatus::Cancelled => &self.cancelled,
        }
    }

    pub fn counts(&self) -> TicketCounts {
        let pending = self.pending.len();
        let preparing = self.preparing.len();
        let ready = self.ready.len();
        let served = self.served.len();
        let cancelled = self.cancelled.len();
        TicketCounts {
            total: pending + preparing + ready + served + cancelled,
            pending,
            preparing,
            ready,
            served,
            cancelled,
        }
    }

    /// Locate a ticket by id in the named buckets.
    pub fn find(&self, ticket_id: &str) -> Option<(TicketStatus, &Ticket)> {
        TicketStatus::ALL.into_iter().find_map(|status| {
            self.bucket(status)
                .iter()
                .find(|ticket| ticket.id == ticket_id)
                .map(|ticket| (status, ticket))
        })
    }

    /// Every bucketed ticket carries its bucket's status, and `all` covers
    /// exactly the named buckets.
    pub fn is_consistent(&self) -> bool {
        let statuses_match = TicketStatus::ALL.into_iter().all(|status| {
            self.bucket(status)
                .iter()
                .all(|ticket| ticket.status == status)
        });
        statuses_match && self.all.len() == self.counts().total
    }

    pub fn is_empty(&self) -> bool {
        self.counts().total == 0
    }
}
