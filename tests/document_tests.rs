// tests/document_tests.rs

use std::io;

use ls_lang::driver::{
    ERROR_PREFIX, NoLoader, ScriptLoader, ScriptOrigin, discover, run_document,
};
use ls_lang::host::RecordingHost;
use ls_lang::registry::Registry;
use ls_lang::{Document, Selection};

// ============================================================================
// Parsing and serialization
// ============================================================================

#[test]
fn test_roundtrip_simple_markup() {
    let markup = r#"<div id="a"><p>texte</p></div>"#;
    assert_eq!(Document::parse(markup).markup(), markup);
}

#[test]
fn test_unclosed_element_closes_at_end() {
    let doc = Document::parse("<div><p>ouvert");
    assert_eq!(doc.markup(), "<div><p>ouvert</p></div>");
}

#[test]
fn test_comments_and_doctype_are_skipped() {
    let doc = Document::parse("<!DOCTYPE html><!-- rien --><p>ok</p>");
    assert_eq!(doc.markup(), "<p>ok</p>");
}

#[test]
fn test_self_closing_tag() {
    let doc = Document::parse("<div><br/>apres</div>");
    assert_eq!(doc.markup(), "<div><br></br>apres</div>");
}

#[test]
fn test_no_entity_decoding() {
    let doc = Document::parse("<p>a &amp; b</p>");
    let Selection::Many(handles) = doc.by_tag("p") else {
        panic!("expected a tag selection");
    };
    assert_eq!(handles[0].text(), "a &amp; b");
}

#[test]
fn test_tag_names_are_case_insensitive() {
    let doc = Document::parse("<DIV>x</DIV>");
    assert_eq!(doc.by_tag("div").len(), 1);
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn test_by_id_returns_single_or_none() {
    let doc = Document::parse(r#"<p id="a">un</p><p id="b">deux</p>"#);
    assert!(matches!(doc.by_id("a"), Selection::Single(_)));
    assert_eq!(doc.by_id("absent"), Selection::None);
}

#[test]
fn test_by_id_takes_first_match() {
    let doc = Document::parse(r#"<p id="x">premier</p><p id="x">second</p>"#);
    let Selection::Single(handle) = doc.by_id("x") else {
        panic!("expected one element");
    };
    assert_eq!(handle.text(), "premier");
}

#[test]
fn test_by_tag_preserves_document_order() {
    let doc = Document::parse("<p>1</p><div><p>2</p></div><p>3</p>");
    let Selection::Many(handles) = doc.by_tag("p") else {
        panic!("expected a tag selection");
    };
    let texts: Vec<String> = handles.iter().map(|h| h.text()).collect();
    assert_eq!(texts, vec!["1", "2", "3"]);
}

#[test]
fn test_by_tag_empty_is_not_an_error() {
    let doc = Document::parse("<p>x</p>");
    let selection = doc.by_tag("table");
    assert_eq!(selection, Selection::Many(vec![]));
    assert!(selection.is_empty());
}

// ============================================================================
// Handles
// ============================================================================

#[test]
fn test_text_projection_concatenates_descendants() {
    let doc = Document::parse(r#"<div id="d">a<b>b</b>c</div>"#);
    let Selection::Single(handle) = doc.by_id("d") else {
        panic!("expected one element");
    };
    assert_eq!(handle.text(), "abc");
}

#[test]
fn test_set_text_replaces_children() {
    let doc = Document::parse(r#"<div id="d"><b>avant</b></div>"#);
    let Selection::Single(handle) = doc.by_id("d") else {
        panic!("expected one element");
    };
    handle.set_text("apres");
    assert_eq!(doc.markup(), r#"<div id="d">apres</div>"#);
}

#[test]
fn test_set_markup_reparses_fragment() {
    let doc = Document::parse(r#"<div id="d">avant</div>"#);
    let Selection::Single(handle) = doc.by_id("d") else {
        panic!("expected one element");
    };
    handle.set_markup("<em>un</em><em>deux</em>");
    assert_eq!(handle.markup(), "<em>un</em><em>deux</em>");
    assert_eq!(doc.by_tag("em").len(), 2);
}

#[test]
fn test_detached_handle_still_reads_its_subtree() {
    // No invalidation tracking: a stale handle keeps operating on the
    // detached subtree.
    let doc = Document::parse(r#"<div id="d"><p>contenu</p></div>"#);
    let Selection::Single(handle) = doc.by_id("d") else {
        panic!("expected one element");
    };
    handle.detach();
    assert_eq!(doc.markup(), "");
    assert_eq!(handle.text(), "contenu");
    handle.set_text("change");
    assert_eq!(handle.text(), "change");
}

// ============================================================================
// Script discovery
// ============================================================================

struct CannedLoader;

impl ScriptLoader for CannedLoader {
    fn load(&self, src: &str) -> io::Result<String> {
        match src {
            "bon.ls" => Ok("msg(\"externe\")".to_string()),
            _ => Err(io::Error::new(io::ErrorKind::NotFound, src.to_string())),
        }
    }
}

#[test]
fn test_discover_filters_on_script_type() {
    let doc = Document::parse(concat!(
        r#"<script type="ls">msg(1)</script>"#,
        r#"<script>ignored()</script>"#,
        r#"<script type="ls">msg(2)</script>"#,
    ));
    let units = discover(&doc, &NoLoader);
    assert_eq!(units.len(), 2);
    assert_eq!(units[0].origin, ScriptOrigin::Inline(0));
    assert_eq!(units[0].source, "msg(1)");
    assert_eq!(units[1].origin, ScriptOrigin::Inline(1));
    assert_eq!(units[1].source, "msg(2)");
}

#[test]
fn test_discover_loads_external_source() {
    let doc = Document::parse(r#"<script type="ls" src="bon.ls"></script>"#);
    let units = discover(&doc, &CannedLoader);
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].origin, ScriptOrigin::External("bon.ls".to_string()));
    assert_eq!(units[0].source, "msg(\"externe\")");
}

#[test]
fn test_discover_skips_failing_loads() {
    let doc = Document::parse(concat!(
        r#"<script type="ls" src="manquant.ls"></script>"#,
        r#"<script type="ls">msg("inline")</script>"#,
    ));
    let units = discover(&doc, &CannedLoader);
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].source, "msg(\"inline\")");
}

// ============================================================================
// Unit isolation
// ============================================================================

#[test]
fn test_failing_unit_does_not_stop_later_units() {
    let doc = Document::parse(concat!(
        r#"<script type="ls">msg(inconnu)</script>"#,
        r#"<script type="ls">msg("second")</script>"#,
    ));
    let host = RecordingHost::new();
    run_document(&doc, &host, &Registry::new(), &NoLoader);

    let emitted = host.emitted();
    assert_eq!(emitted.len(), 2);
    assert!(
        emitted[0].starts_with(ERROR_PREFIX),
        "first line should be the failure report, got: {}",
        emitted[0]
    );
    assert_eq!(emitted[1], "second");
}

#[test]
fn test_syntax_failure_is_reported_with_prefix() {
    let doc = Document::parse(r#"<script type="ls">msg(</script>"#);
    let host = RecordingHost::new();
    run_document(&doc, &host, &Registry::new(), &NoLoader);

    let emitted = host.emitted();
    assert_eq!(emitted.len(), 1);
    assert!(emitted[0].starts_with(ERROR_PREFIX));
    assert!(emitted[0].contains("syntax error"));
}

#[test]
fn test_each_unit_gets_a_fresh_environment() {
    let doc = Document::parse(concat!(
        r#"<script type="ls">def x = 1</script>"#,
        r#"<script type="ls">msg(x)</script>"#,
    ));
    let host = RecordingHost::new();
    run_document(&doc, &host, &Registry::new(), &NoLoader);

    // The second unit cannot see the first unit's bindings.
    let emitted = host.emitted();
    assert_eq!(emitted.len(), 1);
    assert!(emitted[0].starts_with(ERROR_PREFIX));
}

#[test]
fn test_units_share_the_live_document() {
    let doc = Document::parse(concat!(
        r#"<p id="cible">avant</p>"#,
        r#"<script type="ls">doc.id("cible").texte = "premier"</script>"#,
        r#"<script type="ls">doc.id("cible").texte = "dernier"</script>"#,
    ));
    let host = RecordingHost::new();
    run_document(&doc, &host, &Registry::new(), &NoLoader);

    // Last writer wins on the shared tree.
    assert!(doc.markup().contains(r#"<p id="cible">dernier</p>"#));
}
