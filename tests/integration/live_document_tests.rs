/*!
 * End-to-end tests: a watched document keeps being rewritten as it changes
 */

use baklavify::document::DocumentHost;
use baklavify::{DomTree, NodeId, Watcher};

use crate::common::{append_nested_text, init_logging, ready_document, text_of};

/// Watched interactive document whose pending records have been delivered
fn watched_document() -> (DomTree, NodeId, Watcher) {
    init_logging();
    let (mut tree, body) = ready_document();
    let watcher = Watcher::install_default(&mut tree);
    tree.settle();
    (tree, body, watcher)
}

#[test]
fn test_inserted_subtree_shouldBeRewrittenWithoutExplicitScan() {
    let (mut tree, body, _watcher) = watched_document();

    let article = tree.create_element("article");
    let paragraph = tree.create_element("p");
    let text = tree.create_text("I love Balaklavas");
    tree.append_child(paragraph, text);
    tree.append_child(article, paragraph);
    tree.append_child(body, article);
    tree.settle();

    assert_eq!(text_of(&tree, text), "I love Baklavas");
}

#[test]
fn test_edited_text_unit_shouldGetExactlyOneCorrectivePass() {
    init_logging();
    let (mut tree, body) = ready_document();
    let (_, text) = tree.append_element_with_text(body, "p", "balaklava");
    let watcher = Watcher::install_default(&mut tree);
    tree.settle();
    assert_eq!(text_of(&tree, text), "baklava");
    let before = watcher.stats();

    tree.set_text(text, "new balaklava text".to_string());
    let batches = tree.settle();

    assert_eq!(text_of(&tree, text), "new baklava text");
    let after = watcher.stats();
    assert_eq!(after.units_rewritten - before.units_rewritten, 1);

    // The self-induced edit is delivered once more and changes nothing
    assert_eq!(batches, 2);
    assert_eq!(after.batches - before.batches, 2);
}

#[test]
fn test_inserted_text_node_shouldBeRewritten() {
    let (mut tree, body, _watcher) = watched_document();

    let text = tree.create_text("BALAKLAVA!");
    tree.append_child(body, text);
    tree.settle();

    assert_eq!(text_of(&tree, text), "BAKLAVA!");
}

#[test]
fn test_exempt_regions_shouldNeverBeMutated() {
    let (mut tree, body, watcher) = watched_document();

    let in_pre = append_nested_text(&mut tree, body, "pre", "balaklava");
    let in_style = append_nested_text(&mut tree, body, "style", ".balaklava { }");
    let in_noscript = append_nested_text(&mut tree, body, "noscript", "Balaklava");
    tree.settle();

    tree.set_text(in_pre, "BALAKLAVA".to_string());
    tree.settle();

    assert_eq!(text_of(&tree, in_pre), "BALAKLAVA");
    assert_eq!(text_of(&tree, in_style), ".balaklava { }");
    assert_eq!(text_of(&tree, in_noscript), "Balaklava");
    assert_eq!(watcher.stats().units_rewritten, 0);
}

#[test]
fn test_editable_region_shouldBeLeftToTheUser() {
    let (mut tree, body, _watcher) = watched_document();

    let editor = tree.create_element("div");
    tree.set_content_editable(editor, Some(true));
    tree.append_child(body, editor);
    let (_, draft) = tree.append_element_with_text(editor, "p", "typing balaklava");
    tree.settle();

    tree.set_text(draft, "typing balaklavas".to_string());
    tree.settle();

    assert_eq!(text_of(&tree, draft), "typing balaklavas");
}

#[test]
fn test_moved_subtree_shouldBeRescannedAtNewPosition() {
    let (mut tree, body, _watcher) = watched_document();

    let code = tree.create_element("code");
    tree.append_child(body, code);
    let (span, text) = tree.append_element_with_text(code, "span", "balaklava");
    tree.settle();
    assert_eq!(text_of(&tree, text), "balaklava");

    tree.append_child(body, span);
    tree.settle();
    assert_eq!(text_of(&tree, text), "baklava");
}

#[test]
fn test_removed_nodes_shouldBeIgnored() {
    let (mut tree, body, watcher) = watched_document();
    let (paragraph, _) = tree.append_element_with_text(body, "p", "plain");
    tree.settle();
    let before = watcher.stats();

    tree.remove_child(body, paragraph);
    tree.settle();

    let after = watcher.stats();
    assert_eq!(after.batches - before.batches, 1);
    assert_eq!(after.units_processed, before.units_processed);
}

#[test]
fn test_detached_subtree_shouldNotBeTouchedUntilInserted() {
    let (mut tree, body, _watcher) = watched_document();

    let detached = tree.create_element("section");
    let (_, text) = tree.append_element_with_text(detached, "p", "balaklava");
    tree.settle();
    assert_eq!(text_of(&tree, text), "balaklava");

    tree.append_child(body, detached);
    tree.settle();
    assert_eq!(text_of(&tree, text), "baklava");
}

#[test]
fn test_edit_followedByRemoval_shouldStillBeDelivered() {
    let (mut tree, body, watcher) = watched_document();
    let (paragraph, text) = tree.append_element_with_text(body, "p", "plain");
    tree.settle();
    let before = watcher.stats();

    tree.set_text(text, "balaklava".to_string());
    tree.remove_child(body, paragraph);
    tree.settle();

    let after = watcher.stats();
    assert_eq!(after.records - before.records, 2);
    assert_eq!(after.units_rewritten - before.units_rewritten, 1);
    assert_eq!(text_of(&tree, text), "baklava");
}

#[test]
fn test_self_insertion_shouldBeRefusedAndLeaveDocumentWatchable() {
    let (mut tree, body, _watcher) = watched_document();
    let section = tree.create_element("section");
    tree.append_child(body, section);
    tree.settle();

    tree.append_child(section, section);
    let (_, text) = tree.append_element_with_text(section, "p", "Balaklava");
    tree.settle();

    assert_eq!(tree.parent(section), Some(body));
    assert_eq!(text_of(&tree, text), "Baklava");
}
