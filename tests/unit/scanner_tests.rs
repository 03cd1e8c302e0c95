/*!
 * Tests for single text unit processing and subtree scans
 */

use baklavify::{Rewriter, ScanReport};

use crate::common::{append_nested_text, ready_document, text_of};

#[test]
fn test_process_text_unit_withMatch_shouldRewriteInPlace() {
    let (mut tree, body) = ready_document();
    let (_, text) = tree.append_element_with_text(body, "p", "I love Balaklavas");
    tree.flush_mutations();

    let rewriter = Rewriter::default();
    assert!(rewriter.process_text_unit(&mut tree, text));
    assert_eq!(text_of(&tree, text), "I love Baklavas");
    assert_eq!(tree.pending_mutations(), 1);
}

#[test]
fn test_process_text_unit_withoutMatch_shouldNotWrite() {
    let (mut tree, body) = ready_document();
    let (_, text) = tree.append_element_with_text(body, "p", "nothing here");
    let (_, empty) = tree.append_element_with_text(body, "p", "");
    tree.flush_mutations();

    let rewriter = Rewriter::default();
    assert!(!rewriter.process_text_unit(&mut tree, text));
    assert!(!rewriter.process_text_unit(&mut tree, empty));
    assert_eq!(tree.pending_mutations(), 0);
}

#[test]
fn test_process_text_unit_inExemptRegion_shouldLeaveUntouched() {
    let (mut tree, body) = ready_document();
    let text = append_nested_text(&mut tree, body, "textarea", "balaklava");

    let rewriter = Rewriter::default();
    assert!(!rewriter.process_text_unit(&mut tree, text));
    assert_eq!(text_of(&tree, text), "balaklava");
}

#[test]
fn test_process_text_unit_withDetachedNode_shouldStillProcess() {
    let (mut tree, _) = ready_document();
    let orphan = tree.create_text("BALAKLAVA");

    let rewriter = Rewriter::default();
    assert!(rewriter.process_text_unit(&mut tree, orphan));
    assert_eq!(text_of(&tree, orphan), "BAKLAVA");
}

#[test]
fn test_process_text_unit_onElement_shouldBeNoOp() {
    let (mut tree, body) = ready_document();
    let rewriter = Rewriter::default();
    assert!(!rewriter.process_text_unit(&mut tree, body));
}

#[test]
fn test_scan_subtree_shouldRewriteAllUnitsAndSkipExempt() {
    let (mut tree, body) = ready_document();
    let first = append_nested_text(&mut tree, body, "span", "balaklava one");
    let in_script = append_nested_text(&mut tree, body, "script", "var balaklava = 1;");
    let in_pre = append_nested_text(&mut tree, body, "pre", "Balaklava");
    let second = append_nested_text(&mut tree, body, "em", "no match");
    let third = append_nested_text(&mut tree, body, "strong", "BALAKLAVAS");

    let report = Rewriter::default().scan_subtree(&mut tree, body);

    // Exempt subtrees are pruned before their text is visited
    assert_eq!(report, ScanReport { visited: 3, rewritten: 2 });
    assert_eq!(text_of(&tree, first), "baklava one");
    assert_eq!(text_of(&tree, second), "no match");
    assert_eq!(text_of(&tree, third), "BAKLAVAS");
    assert_eq!(text_of(&tree, in_script), "var balaklava = 1;");
    assert_eq!(text_of(&tree, in_pre), "Balaklava");
}

#[test]
fn test_scan_subtree_shouldVisitInDocumentOrder() {
    let (mut tree, body) = ready_document();
    let list = tree.create_element("ul");
    tree.append_child(body, list);
    for word in ["Balaklava", "balaklava", "BALAKLAVA"] {
        tree.append_element_with_text(list, "li", word);
    }

    Rewriter::default().scan_subtree(&mut tree, body);
    assert_eq!(tree.text_content(body), "BaklavabaklavaBAKLAVA");
}

#[test]
fn test_scan_subtree_withTextRoot_shouldDelegateToProcessor() {
    let (mut tree, body) = ready_document();
    let (_, text) = tree.append_element_with_text(body, "p", "balaklava");

    let report = Rewriter::default().scan_subtree(&mut tree, text);
    assert_eq!(report, ScanReport { visited: 1, rewritten: 1 });
    assert_eq!(text_of(&tree, text), "baklava");
}

#[test]
fn test_scan_subtree_withRootInsideExemptRegion_shouldDoNothing() {
    let (mut tree, body) = ready_document();
    let code = tree.create_element("code");
    tree.append_child(body, code);
    let (span, text) = tree.append_element_with_text(code, "span", "balaklava");

    let report = Rewriter::default().scan_subtree(&mut tree, span);
    assert_eq!(report, ScanReport::default());
    assert_eq!(text_of(&tree, text), "balaklava");
}

#[test]
fn test_scan_subtree_withEditableRegion_shouldSkipIt() {
    let (mut tree, body) = ready_document();
    let editor = tree.create_element("div");
    tree.append_child(body, editor);
    tree.set_content_editable(editor, Some(true));
    let (_, inner_text) = tree.append_element_with_text(editor, "p", "balaklava");
    let outside = append_nested_text(&mut tree, body, "span", "balaklava");

    let report = Rewriter::default().scan_subtree(&mut tree, body);
    assert_eq!(report.rewritten, 1);
    assert_eq!(text_of(&tree, inner_text), "balaklava");
    assert_eq!(text_of(&tree, outside), "baklava");

    // Leaving edit mode makes the region rewritable
    tree.set_content_editable(editor, None);
    let report = Rewriter::default().scan_subtree(&mut tree, body);
    assert_eq!(report, ScanReport { visited: 2, rewritten: 1 });
    assert_eq!(text_of(&tree, inner_text), "baklava");
}

#[test]
fn test_scan_subtree_withCommentRoot_shouldDoNothing() {
    let (mut tree, body) = ready_document();
    let comment = tree.create_comment("balaklava");
    tree.append_child(body, comment);

    let report = Rewriter::default().scan_subtree(&mut tree, comment);
    assert_eq!(report, ScanReport::default());
    assert_eq!(tree.comment_text(comment), Some("balaklava"));
}
