//! Turns a results container into book records.
//!
//! Each listing row gets one empty record and one pre-order walk over its
//! subtree. Every node is offered to every extractor of the site rather than
//! dispatching on tag, since markup revisions move fields to different
//! depths. That costs O(nodes × fields) per row, which is negligible for a
//! search page of a few dozen listings.

use crate::document::DocumentNode;
use crate::extract::{extractors_for, is_row, ApplyFn, Visit};
use toppler_core::{BookRecord, Site};

/// Build one record per listing row of `container`, keeping only complete ones.
pub fn build_records(container: &DocumentNode, site: Site) -> Vec<BookRecord> {
    let apply = extractors_for(site);

    let records: Vec<BookRecord> = container
        .children()
        .iter()
        .filter(|child| is_row(site, child))
        .map(|row| build_record(row, site, apply))
        .collect();

    let total = records.len();
    let kept: Vec<BookRecord> = records
        .into_iter()
        .filter(BookRecord::is_complete)
        .collect();

    tracing::debug!(
        "{}: kept {} of {} result rows",
        site,
        kept.len(),
        total
    );
    kept
}

fn build_record(row: &DocumentNode, site: Site, apply: ApplyFn) -> BookRecord {
    let mut record = BookRecord::empty(site);
    walk(Visit::new(row), &mut record, apply);
    record
}

fn walk(visit: Visit<'_>, record: &mut BookRecord, apply: ApplyFn) {
    apply(record, visit);

    for child_visit in child_visits(visit.node.children()) {
        walk(child_visit, record, apply);
    }
}

/// Pair each child with the next element among its later siblings, in one
/// backwards pass.
fn child_visits(children: &[DocumentNode]) -> Vec<Visit<'_>> {
    let mut visits = Vec::with_capacity(children.len());
    let mut next_element = None;
    for child in children.iter().rev() {
        let visit = Visit::new(child);
        visits.push(match next_element {
            Some(sibling) => visit.followed_by(sibling),
            None => visit,
        });
        if child.as_element().is_some() {
            next_element = Some(child);
        }
    }
    visits.reverse();
    visits
}
