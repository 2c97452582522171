use taxatree::model::{AnnotatedTree, LookupTable, TaxonRecord};
use taxatree::newick::{NewickParser, parse_str};
use taxatree::parser::ParsingErrorType;

fn parse_plain(newick: &str) -> AnnotatedTree {
    parse_str(newick, &LookupTable::new()).unwrap()
}

fn leaf_names(tree: &AnnotatedTree) -> Vec<&str> {
    tree.leaves().map(|n| n.name().unwrap_or("")).collect()
}

// --- TESTS TREE SHAPE ---
#[test]
fn test_basic_tree() {
    let tree = parse_plain("((A:1.0,B:2.0):3.0,C:4.0):0.5;");

    assert_eq!(tree.num_leaves(), 3);
    assert_eq!(tree.num_internal(), 2);
    assert_eq!(tree.num_nodes(), 5);
    assert_eq!(leaf_names(&tree), vec!["A", "B", "C"]);

    // Root has children (internal, C)
    let root = tree.root();
    let root_children = root.children().unwrap();
    assert_eq!(root_children.len(), 2);
    assert_eq!(root.length(), Some(0.5));

    // Internal node has children (A, B)
    let internal = tree.node(root_children[0]);
    assert!(internal.is_internal());
    assert_eq!(internal.length(), Some(3.0));
    let internal_children = internal.children().unwrap();
    assert_eq!(tree.node(internal_children[0]).name(), Some("A"));
    assert_eq!(tree.node(internal_children[1]).name(), Some("B"));

    let leaf_c = tree.node(root_children[1]);
    assert!(leaf_c.is_leaf());
    assert_eq!(leaf_c.name(), Some("C"));
    assert_eq!(leaf_c.length(), Some(4.0));
}

#[test]
fn test_nesting_with_internal_name() {
    let tree = parse_plain("(A,(B,C)D);");

    let root = tree.root();
    assert_eq!(root.name(), None);
    let children: Vec<_> = tree.children_of(root.index()).collect();
    assert_eq!(children.len(), 2);

    assert_eq!(children[0].name(), Some("A"));
    assert!(children[0].is_leaf());

    let d = children[1];
    assert_eq!(d.name(), Some("D"));
    let d_children: Vec<_> = tree.children_of(d.index()).filter_map(|n| n.name()).collect();
    assert_eq!(d_children, vec!["B", "C"]);
}

#[test]
fn test_named_root() {
    let tree = parse_plain("(A,B)Primates;");
    assert_eq!(tree.root().name(), Some("Primates"));
    assert_eq!(tree.root().common(), Some("Primates"));
}

#[test]
fn test_multifurcation() {
    let tree = parse_plain("(A,B,C,(D,E,F));");
    assert_eq!(tree.root().num_children(), 4);
    assert_eq!(tree.num_leaves(), 6);
    assert_eq!(leaf_names(&tree), vec!["A", "B", "C", "D", "E", "F"]);
}

#[test]
fn test_single_child_groups() {
    let tree = parse_plain("((A));");
    assert_eq!(tree.num_nodes(), 3);
    assert_eq!(tree.num_leaves(), 1);
    assert_eq!(tree.depth(), 2);
}

#[test]
fn test_whitespace_around_delimiters() {
    let tree = parse_plain(" ( A : 1.5 ,\n  B c ) Root ;\n");
    assert_eq!(leaf_names(&tree), vec!["A", "B c"]);
    assert_eq!(tree.find_by_name("A").unwrap().length(), Some(1.5));
    assert_eq!(tree.root().name(), Some("Root"));
}

// --- TESTS LABELS ---
#[test]
fn test_underscores_decoded() {
    let tree = parse_plain("(Homo_sapiens,Pan_troglodytes);");
    assert_eq!(leaf_names(&tree), vec!["Homo sapiens", "Pan troglodytes"]);
}

#[test]
fn test_common_name() {
    let tree = parse_plain("(Homo_sapiens-Human,Pan_paniscus);");
    let human = tree.find_by_name("Homo sapiens").unwrap();
    assert_eq!(human.common(), Some("Human"));

    // Without hyphen, the common name is the whole decoded label
    let bonobo = tree.find_by_name("Pan paniscus").unwrap();
    assert_eq!(bonobo.common(), Some("Pan paniscus"));
}

#[test]
fn test_ott_id() {
    let tree = parse_plain("(Homo_sapiens ott770315,Gorilla_gorilla_ott417965-Gorilla);");

    let human = tree.find_by_name("Homo sapiens").unwrap();
    assert_eq!(human.ott(), Some("770315"));

    let gorilla = tree.find_by_name("Gorilla gorilla").unwrap();
    assert_eq!(gorilla.ott(), Some("417965"));
    assert_eq!(gorilla.common(), Some("Gorilla"));
}

#[test]
fn test_node_without_label_has_no_name_or_common() {
    let tree = parse_plain("((A,B),C);");
    let internal = tree.node(tree.root().children().unwrap()[0]);
    assert_eq!(internal.name(), None);
    assert_eq!(internal.common(), None);
    assert_eq!(internal.ott(), None);
}

// --- TESTS BRANCH LENGTHS ---
#[test]
fn test_branch_length() {
    let tree = parse_plain("(A:0.25,B);");
    let a = tree.find_by_name("A").unwrap();
    assert_eq!(a.length(), Some(0.25));
    assert!(a.has_valid_length());

    let b = tree.find_by_name("B").unwrap();
    assert_eq!(b.length(), None);
    assert!(!b.has_valid_length());
}

#[test]
fn test_scientific_notation() {
    let tree = parse_plain("((A:1e-5,B:2.5E+3):1.0e2,C:3.14E-10):0.0;");
    assert_eq!(tree.find_by_name("A").unwrap().length(), Some(1e-5));
    assert_eq!(tree.find_by_name("B").unwrap().length(), Some(2500.0));
    assert_eq!(tree.find_by_name("C").unwrap().length(), Some(3.14e-10));
    assert_eq!(tree.root().length(), Some(0.0));
}

#[test]
fn test_branch_length_trailing_garbage_ignored() {
    let tree = parse_plain("(A:0.5xyz,B:7);");
    assert_eq!(tree.find_by_name("A").unwrap().length(), Some(0.5));
}

#[test]
fn test_invalid_branch_length_is_nan() {
    let tree = parse_plain("(A:abc,B:1);");
    let a = tree.find_by_name("A").unwrap();
    assert!(a.length().unwrap().is_nan());
    assert!(!a.has_valid_length());
    assert_eq!(tree.total_branch_length(), 1.0);
}

// --- TESTS ANNOTATION ---
fn primate_table() -> LookupTable {
    LookupTable::build(vec![
        TaxonRecord::new("Hominidae").with_estimate(5.0),
        TaxonRecord::new("Hylobatidae")
            .with_estimate(2.0)
            .with_scaled_estimate(0.4)
            .with_interval(1.5, 2.5),
        TaxonRecord::new("Tarsiidae").with_estimate(0.0),
    ])
}

#[test]
fn test_annotation_defaults_missing_fields_to_zero() {
    let table = primate_table();
    let tree = parse_str("(Hominidae,Cebidae);", &table).unwrap();

    let hominidae = tree.find_by_name("Hominidae").unwrap();
    assert_eq!(hominidae.estimate(), Some(5.0));
    assert_eq!(hominidae.lwr_95(), Some(0.0));
    assert_eq!(hominidae.scaled_estimate(), Some(0.0));
    assert_eq!(hominidae.upr_95(), Some(0.0));
}

#[test]
fn test_annotation_copies_all_fields() {
    let table = primate_table();
    let tree = parse_str("(Hylobatidae:0.3,Hominidae:0.2)Hominoidea;", &table).unwrap();

    let stats = tree.find_by_name("Hylobatidae").unwrap().stats().unwrap();
    assert_eq!(stats.estimate, 2.0);
    assert_eq!(stats.scaled_estimate, 0.4);
    assert_eq!(stats.lwr_95, 1.5);
    assert_eq!(stats.upr_95, 2.5);
}

#[test]
fn test_missing_lookup_leaves_stats_unset() {
    let table = primate_table();
    let tree = parse_str("(Hominidae,Cebidae)Simiiformes;", &table).unwrap();

    let cebidae = tree.find_by_name("Cebidae").unwrap();
    assert!(cebidae.stats().is_none());
    assert_eq!(cebidae.estimate(), None);
    assert_eq!(cebidae.lwr_95(), None);
    assert_eq!(cebidae.scaled_estimate(), None);
    assert_eq!(cebidae.upr_95(), None);

    assert!(tree.root().stats().is_none());
    assert_eq!(tree.annotated_nodes().count(), 1);
}

#[test]
fn test_zero_estimate_is_present_not_absent() {
    let table = primate_table();
    let tree = parse_str("(Tarsiidae,Cebidae);", &table).unwrap();

    assert_eq!(tree.find_by_name("Tarsiidae").unwrap().estimate(), Some(0.0));
    assert_eq!(tree.find_by_name("Cebidae").unwrap().estimate(), None);
}

#[test]
fn test_annotation_uses_decoded_name() {
    let table = primate_table();
    let tree = parse_str(
        "(Hominidae_ott770311-Great_apes,Hylobatidae_-_Gibbons)Hominoidea;",
        &table,
    )
    .unwrap();

    let hominidae = tree.find_by_name("Hominidae").unwrap();
    assert_eq!(hominidae.estimate(), Some(5.0));
    assert_eq!(hominidae.ott(), Some("770311"));
    assert_eq!(hominidae.common(), Some("Great apes"));

    let hylobatidae = tree.find_by_name("Hylobatidae").unwrap();
    assert_eq!(hylobatidae.estimate(), Some(2.0));
    assert_eq!(hylobatidae.common(), Some(" Gibbons"));
}

#[test]
fn test_internal_node_annotation() {
    let table = LookupTable::build(vec![TaxonRecord::new("Hominoidea").with_estimate(9.0)]);
    let tree = parse_str("(Hylobatidae,Hominidae)Hominoidea;", &table).unwrap();
    assert_eq!(tree.root().estimate(), Some(9.0));
}

#[test]
fn test_without_lookup() {
    let tree = NewickParser::without_lookup()
        .parse_str("(Hominidae,Hylobatidae);")
        .unwrap();
    assert_eq!(tree.annotated_nodes().count(), 0);
    assert_eq!(tree.num_leaves(), 2);
}

// --- TESTS BEST EFFORT / MALFORMED INPUT ---
#[test]
fn test_empty_labels_skipped() {
    let tree = parse_plain("(,B);");
    let children: Vec<_> = tree.children_of(tree.root_index()).collect();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].name(), None);
    assert_eq!(children[0].common(), None);
    assert_eq!(children[1].name(), Some("B"));
}

#[test]
fn test_leading_label_without_group_ignored() {
    let tree = parse_plain("A;");
    assert_eq!(tree.root().name(), None);
    assert!(tree.root().is_leaf());
    assert_eq!(tree.num_nodes(), 1);
}

#[test]
fn test_empty_string() {
    let tree = parse_plain("");
    assert_eq!(tree.num_nodes(), 1);
    assert!(tree.root().is_leaf());
}

#[test]
fn test_missing_semicolon() {
    let tree = parse_plain("(A,B)");
    assert_eq!(leaf_names(&tree), vec!["A", "B"]);
}

#[test]
fn test_unclosed_groups_return_root() {
    let tree = parse_plain("(A,(B,C");
    assert_eq!(tree.root_index(), 0);
    assert_eq!(leaf_names(&tree), vec!["A", "B", "C"]);
    assert_eq!(tree.root().num_children(), 2);
}

#[test]
fn test_regrouping_replaces_children() {
    let tree = parse_plain("(A)(B);");
    assert_eq!(tree.root().num_children(), 1);
    assert_eq!(leaf_names(&tree), vec!["B"]);
}

#[test]
fn test_unmatched_closing_parenthesis() {
    let result = parse_plain_result("(A));");
    let err = result.unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::UnmatchedClosingParenthesis);
    assert_eq!(err.position(), 3);
    assert_eq!(err.context(), ");");
}

#[test]
fn test_sibling_outside_group() {
    let err = parse_plain_result("A,B;").unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::SiblingOutsideGroup);
    assert_eq!(err.position(), 1);

    let err = parse_plain_result("(A,B),C;").unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::SiblingOutsideGroup);
    assert_eq!(err.position(), 5);
}

#[test]
fn test_trailing_input_ignored_by_default() {
    let tree = parse_plain("(A,B);(C,D);");
    assert_eq!(leaf_names(&tree), vec!["A", "B"]);

    // Even malformed trailing input is never looked at
    let tree = parse_plain("(A,B);)))");
    assert_eq!(tree.num_leaves(), 2);
}

#[test]
fn test_trailing_input_strict() {
    let parser = NewickParser::without_lookup().with_strict_termination(true);

    let err = parser.parse_str("(A,B);(C,D);").unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::TrailingInput);
    assert_eq!(err.position(), 6);

    let err = parser.parse_str("(A,B); extra").unwrap_err();
    assert_eq!(err.kind(), &ParsingErrorType::TrailingInput);

    // Trailing whitespace is fine
    assert!(parser.parse_str("(A,B);\n\n").is_ok());
}

#[test]
fn test_error_display() {
    let err = parse_plain_result("(A));").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("position 3"));
    assert!(message.contains("Context"));
}

fn parse_plain_result(
    newick: &str,
) -> Result<AnnotatedTree, taxatree::parser::ParsingError> {
    NewickParser::without_lookup().parse_str(newick)
}

// --- TESTS FILE PARSING ---
#[test]
fn test_parse_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("apes.nwk");
    std::fs::write(&path, "((Homo_sapiens:6.4,Pan_troglodytes:6.4):2.3,Gorilla_gorilla:8.7);\n").unwrap();

    let tree = taxatree::parse_newick_file(&path, &LookupTable::new()).unwrap();
    assert_eq!(
        leaf_names(&tree),
        vec!["Homo sapiens", "Pan troglodytes", "Gorilla gorilla"]
    );
}

#[test]
fn test_parse_file_missing() {
    let err = taxatree::parse_newick_file("does/not/exist.nwk", &LookupTable::new()).unwrap_err();
    assert!(matches!(err.kind(), ParsingErrorType::IoError(_)));
}
