use nexus::NexusDocument;
use nexus::block::BlockBody;
use nexus::block::mrbayes::Switch;
use nexus::parser::{ParseError, Parser};

fn parse(source: &str) -> NexusDocument {
    Parser::new(source.to_string(), 0)
        .parse()
        .expect("parse failed")
}

fn parse_err(source: &str) -> Vec<ParseError> {
    match Parser::new(source.to_string(), 0).parse() {
        Ok(doc) => panic!("expected a parse error, got {} block(s)", doc.blocks.len()),
        Err(errors) => errors,
    }
}

fn first_message(source: &str) -> String {
    parse_err(source)[0].message.clone()
}

const PRIMATES: &str = "#NEXUS

[ Data from a classic primate mtDNA example ]
BEGIN DATA;
    DIMENSIONS NTAX=4 NCHAR=8;
    FORMAT DATATYPE=DNA MISSING=? GAP=-;
    MATRIX
        Tarsius_syrichta  AAGTTTCA
        Lemur_catta       AAGCTTCA
        Homo_sapiens      AAGCTTCA
        'Pan paniscus'    AAGCTTCA
    ;
END;

BEGIN mrbayes;
    set autoclose=yes nowarn=yes;
    lset nst=6 rates=invgamma;
    mcmc ngen=10000 samplefreq=10 [ keep it short ];
    sump burnin=250;
    sumt burnin=250;
END;
";

#[test]
fn blocks_in_source_order() {
    let doc = parse(PRIMATES);
    let names: Vec<&str> = doc.blocks.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, ["DATA", "mrbayes"]);
    assert!(doc.warnings.is_empty());
}

#[test]
fn opaque_block_keeps_commands() {
    let doc = parse(PRIMATES);
    let data = doc.find_block("data").expect("data block");
    assert!(matches!(data.body, BlockBody::Opaque(_)));
    let names: Vec<&str> = data.commands().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["DIMENSIONS", "FORMAT", "MATRIX"]);
}

#[test]
fn mrbayes_set_command() {
    let doc = parse(PRIMATES);
    let block = doc.mrbayes_block().expect("mrbayes block");
    assert_eq!(block.autoclose, Switch::On);
    assert_eq!(block.nowarn, Switch::On);
    assert_eq!(block.execute, None);
    assert_eq!(block.commands.len(), 5);
}

#[test]
fn shorthand_settings() {
    let doc = parse("#NEXUS\nBEGIN mrbayes;\n autoclose=yes;\n END;\n");
    let block = doc.mrbayes_block().unwrap();
    assert_eq!(block.autoclose, Switch::On);
    assert_eq!(block.nowarn, Switch::Unset);
}

#[test]
fn switch_values() {
    let doc = parse("#NEXUS\nBEGIN mrbayes;\n autoclose=no;\n nowarn=TRUE;\n END;\n");
    let block = doc.mrbayes_block().unwrap();
    assert_eq!(block.autoclose, Switch::Off);
    assert_eq!(block.nowarn, Switch::On);
    assert!(!block.autoclose.is_on());
    assert!(block.autoclose.is_set());
}

#[test]
fn later_setting_overrides_earlier() {
    let doc = parse("#NEXUS\nbegin mrbayes;\n set autoclose=yes;\n set autoclose=no;\nend;\n");
    assert_eq!(doc.mrbayes_block().unwrap().autoclose, Switch::Off);
}

#[test]
fn block_name_is_case_insensitive() {
    let doc = parse("#nexus\nBEGIN MrBayes;\n SET AutoClose=Yes;\nEND;\n");
    assert_eq!(doc.blocks[0].name, "MrBayes");
    assert_eq!(doc.mrbayes_block().unwrap().autoclose, Switch::On);
}

#[test]
fn first_mrbayes_block_wins() {
    let src = "#NEXUS\nBEGIN mrbayes;\n autoclose=no;\nEND;\nBEGIN mrbayes;\n autoclose=yes;\nEND;\n";
    let doc = parse(src);
    assert_eq!(doc.blocks.len(), 2);
    assert_eq!(doc.mrbayes_block().unwrap().autoclose, Switch::Off);
}

#[test]
fn no_mrbayes_block_is_not_an_error() {
    let doc = parse("#NEXUS\nBEGIN taxa;\n dimensions ntax=2;\n taxlabels a b;\nEND;\n");
    assert!(doc.mrbayes_block().is_none());
    assert_eq!(doc.blocks.len(), 1);
}

#[test]
fn header_only_file() {
    let doc = parse("#NEXUS\n");
    assert!(doc.blocks.is_empty());
}

#[test]
fn execute_forms() {
    let doc = parse("#NEXUS\nBEGIN mrbayes;\n autoclose=yes;\n execute=other.nex;\n END;\n");
    assert_eq!(doc.mrbayes_block().unwrap().execute.as_deref(), Some("other.nex"));

    let doc = parse("#NEXUS\nBEGIN mrbayes;\n execute ' run/other.nex ';\nEND;\n");
    let block = doc.mrbayes_block().unwrap();
    assert_eq!(block.execute.as_deref(), Some(" run/other.nex "));
    assert_eq!(block.execute_target(), Some("run/other.nex"));
}

#[test]
fn blank_execute_has_no_target() {
    let doc = parse("#NEXUS\nBEGIN mrbayes;\n execute='   ';\nEND;\n");
    let block = doc.mrbayes_block().unwrap();
    assert!(block.execute.is_some());
    assert_eq!(block.execute_target(), None);
}

#[test]
fn comments_are_skipped_and_nest() {
    let src = "#NEXUS\n[outer [inner] still comment]\nBEGIN mrbayes; [set autoclose=no;]\n set autoclose=yes;\nEND;\n";
    let doc = parse(src);
    assert_eq!(doc.mrbayes_block().unwrap().autoclose, Switch::On);
}

#[test]
fn quoted_words_unescape() {
    let doc = parse("#NEXUS\nBEGIN mrbayes;\n execute 'it''s.nex';\nEND;\n");
    assert_eq!(doc.mrbayes_block().unwrap().execute.as_deref(), Some("it's.nex"));
}

#[test]
fn byte_order_mark_is_ignored() {
    let doc = parse("\u{feff}#NEXUS\nBEGIN mrbayes;\n autoclose=yes;\nEND;\n");
    assert!(doc.mrbayes_block().is_some());
}

#[test]
fn endblock_closes_a_block() {
    let doc = parse("#NEXUS\nBEGIN trees;\n tree t1 = ((a,b),c);\nENDBLOCK;\n");
    assert_eq!(doc.blocks[0].commands().len(), 1);
}

#[test]
fn end_closes_a_block_mid_command() {
    let src = "#NEXUS\nBEGIN taxa; dimensions ntax=2 END;\nBEGIN mrbayes;\n autoclose=yes;\nEND;\n";
    let doc = parse(src);
    assert_eq!(doc.blocks.len(), 2);

    let taxa = &doc.blocks[0];
    assert_eq!(taxa.commands().len(), 1);
    assert_eq!(taxa.commands()[0].name, "dimensions");
    assert_eq!(taxa.commands()[0].args.len(), 3);
    assert_eq!(&src[taxa.span.clone()], "BEGIN taxa; dimensions ntax=2 END;");
    assert_eq!(doc.mrbayes_block().unwrap().autoclose, Switch::On);
}

#[test]
fn quoted_end_does_not_close_a_block() {
    let doc = parse("#NEXUS\nBEGIN taxa;\n taxlabels 'end' b;\nEND;\n");
    assert_eq!(doc.blocks[0].commands()[0].args.len(), 2);
}

#[test]
fn end_without_semicolon_is_an_ordinary_word() {
    let doc = parse("#NEXUS\nBEGIN sets;\n charset end = 1-10;\nEND;\n");
    assert_eq!(doc.blocks[0].commands()[0].args.len(), 3);
}

#[test]
fn unknown_set_option_is_a_warning() {
    let doc = parse("#NEXUS\nBEGIN mrbayes;\n set autoclose=yes colour=blue;\nEND;\n");
    assert_eq!(doc.warnings.len(), 1);
    assert!(doc.warnings[0].message.contains("colour"));
    assert_eq!(doc.mrbayes_block().unwrap().autoclose, Switch::On);
}

#[test]
fn command_display_round_trips_layout() {
    let doc = parse("#NEXUS\nBEGIN mrbayes;\n set autoclose = yes  nowarn=no;\n execute 'a b.nex';\nEND;\n");
    let commands = &doc.mrbayes_block().unwrap().commands;
    assert_eq!(commands[0].to_string(), "set autoclose=yes nowarn=no;");
    assert_eq!(commands[1].to_string(), "execute 'a b.nex';");
}

#[test]
fn block_span_covers_begin_to_end() {
    let src = "#NEXUS\nBEGIN mrbayes;\n autoclose=yes;\nEND;\n";
    let doc = parse(src);
    let span = doc.blocks[0].span.clone();
    assert_eq!(&src[span], "BEGIN mrbayes;\n autoclose=yes;\nEND;");
}

// ---------------------------------------------------------------------------
// Malformed input
// ---------------------------------------------------------------------------

#[test]
fn missing_header() {
    assert!(first_message("BEGIN mrbayes;\n autoclose=yes;\nEND;\n").contains("#NEXUS"));
    assert!(first_message("").contains("#NEXUS"));
}

#[test]
fn unterminated_block() {
    let msg = first_message("#NEXUS\nBEGIN mrbayes;\n autoclose=yes;\n");
    assert!(msg.contains("unterminated block 'mrbayes'"), "{}", msg);
}

#[test]
fn unterminated_block_without_mrbayes_is_still_an_error() {
    let msg = first_message("#NEXUS\nBEGIN taxa;\n dimensions ntax=2;\n");
    assert!(msg.contains("unterminated block 'taxa'"), "{}", msg);
}

#[test]
fn unterminated_command() {
    let msg = first_message("#NEXUS\nBEGIN mrbayes;\n autoclose=yes");
    assert!(msg.contains("unterminated command 'autoclose'"), "{}", msg);
}

#[test]
fn missing_end_before_next_begin() {
    let msg = first_message("#NEXUS\nBEGIN taxa;\n dimensions ntax=2;\nBEGIN mrbayes;\n autoclose=yes;\nEND;\n");
    assert!(msg.contains("BEGIN inside block 'taxa'"), "{}", msg);
}

#[test]
fn unterminated_comment_and_quote() {
    assert!(first_message("#NEXUS\n[ never closed\n").contains("unterminated comment"));
    assert!(first_message("#NEXUS\nBEGIN mrbayes;\n execute 'x.nex;\nEND;\n").contains("unterminated quoted word"));
}

#[test]
fn stray_token_outside_block() {
    let msg = first_message("#NEXUS\nautoclose=yes;\n");
    assert!(msg.contains("expected BEGIN"), "{}", msg);
}

#[test]
fn unknown_command_in_mrbayes_block() {
    let msg = first_message("#NEXUS\nBEGIN mrbayes;\n autoclose=yes;\n frobnicate now;\nEND;\n");
    assert_eq!(msg, "unrecognized command 'frobnicate' in mrbayes block");
}

#[test]
fn unknown_command_in_other_block_is_accepted() {
    let doc = parse("#NEXUS\nBEGIN paup;\n frobnicate now;\nEND;\n");
    assert_eq!(doc.blocks[0].commands()[0].name, "frobnicate");
}

#[test]
fn invalid_switch_value() {
    let errors = parse_err("#NEXUS\nBEGIN mrbayes;\n set autoclose=maybe;\nEND;\n");
    assert_eq!(errors[0].message, "invalid value 'maybe' for autoclose");
    assert_eq!(errors[0].notes, ["expected yes or no"]);
}

#[test]
fn malformed_set_syntax() {
    assert!(first_message("#NEXUS\nBEGIN mrbayes;\n set autoclose;\nEND;\n").contains("expected '='"));
    assert!(first_message("#NEXUS\nBEGIN mrbayes;\n set autoclose=;\nEND;\n").contains("missing value"));
}

#[test]
fn all_command_errors_are_reported() {
    let errors = parse_err("#NEXUS\nBEGIN mrbayes;\n foo;\n bar;\nEND;\n");
    assert_eq!(errors.len(), 2);
}

#[test]
fn describe_reports_line_and_column() {
    let src = "#NEXUS\nBEGIN mrbayes;\n  frobnicate;\nEND;\n";
    let errors = parse_err(src);
    assert_eq!(
        errors[0].describe(src),
        "line 3, column 3: unrecognized command 'frobnicate' in mrbayes block"
    );
}
