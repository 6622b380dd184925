//! In-memory client search.

use crate::client::Client;

/// Filter an already-loaded client list by name or phone.
///
/// Matching is a case-insensitive substring test against the name or the
/// phone. The term is trimmed first, so a whitespace-only term counts as
/// blank rather than as a literal run of spaces, and a blank term matches
/// every client. Input order is preserved.
pub fn search_clients<'a>(clients: &'a [Client], term: &str) -> Vec<&'a Client> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return clients.iter().collect();
    }

    clients
        .iter()
        .filter(|client| {
            client.name().to_lowercase().contains(&needle)
                || client
                    .phone()
                    .is_some_and(|phone| phone.to_lowercase().contains(&needle))
        })
        .collect()
}
