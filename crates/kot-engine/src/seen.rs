use std::collections::HashSet;

use kot_protocol::Ticket;

/// Ticket ids the new-order alert has already sounded for.
///
/// Only grows; one set per engine instance.
#[derive(Debug, Clone, Default)]
pub struct SeenAlertSet {
    ids: HashSet<String>,
}

impl SeenAlertSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, ticket_id: &str) -> bool {
        self.ids.contains(ticket_id)
    }

    /// Tickets not yet alerted for, first occurrence of each id only.
    pub fn unseen<'a>(&self, tickets: &'a [Ticket]) -> Vec<&'a Ticket> {
        let mut batch = HashSet::new();
        tickets
            .iter()
            .filter(|t| !self.ids.contains(&t.id) && batch.insert(t.id.as_str()))
            .collect()
    }

    pub fn mark<I>(&mut self, ticket_ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.ids.extend(ticket_ids);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
