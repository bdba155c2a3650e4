//! Page-set editing feeding into the planner.

use std::sync::Arc;

use pdfcombine::config::DocumentOptions;
use pdfcombine::editor::{PageSelection, PageSetEditor};
use pdfcombine::plan::{PageOp, build_plan};
use pdfcombine::queue::{FileDescriptor, FileQueue, SourceFile};
use pretty_assertions::assert_eq;

fn queued_pdf(queue: &mut FileQueue, pages: usize) -> pdfcombine::FileId {
    queue.push(FileDescriptor::pdf(
        Arc::new(SourceFile::new("doc.pdf", Vec::new())),
        pages,
    ))
}

fn planned_pages(queue: &FileQueue) -> Vec<usize> {
    build_plan(queue.as_slice(), &DocumentOptions::default())
        .ops
        .iter()
        .filter_map(|op| match op {
            PageOp::CopySourcePage { page_index, .. } => Some(*page_index),
            _ => None,
        })
        .collect()
}

#[test]
fn test_remove_then_restore_round_trip() {
    let mut queue = FileQueue::new();
    let id = queued_pdf(&mut queue, 5);
    let mut editor = PageSetEditor::new();

    let range = editor.remove("", 5, 2).unwrap();
    queue.set_range(id, range.clone());
    assert_eq!(planned_pages(&queue), vec![0, 1, 3, 4]);

    let selection = PageSelection::derive(&range, 5);
    assert_eq!(selection.excluded, vec![2]);

    let restored = editor.add(&range, 5, 2).unwrap();
    queue.set_range(id, restored);
    assert_eq!(planned_pages(&queue), vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_reorder_changes_output_order() {
    let mut queue = FileQueue::new();
    let id = queued_pdf(&mut queue, 4);
    let editor = PageSetEditor::new();

    let range = editor.reorder("", 4, 3, 0).unwrap();
    queue.set_range(id, range);
    assert_eq!(planned_pages(&queue), vec![3, 0, 1, 2]);
}

#[test]
fn test_removing_last_page_selects_everything() {
    let mut queue = FileQueue::new();
    let id = queued_pdf(&mut queue, 3);
    let mut editor = PageSetEditor::new();

    let range = editor.remove("2", 3, 1).unwrap();
    assert_eq!(range, "");
    queue.set_range(id, range);
    assert_eq!(planned_pages(&queue), vec![0, 1, 2]);
}

#[test]
fn test_move_file_changes_plan_order() {
    let mut queue = FileQueue::new();
    let first = queued_pdf(&mut queue, 1);
    let second = queued_pdf(&mut queue, 1);
    assert!(queue.move_file(1, 0));

    let sources: Vec<_> = build_plan(queue.as_slice(), &DocumentOptions::default())
        .ops
        .iter()
        .filter_map(PageOp::source)
        .collect();
    assert_eq!(sources, vec![second, first]);
}
