//! Integration tests for texnum number formatting and macro expansion

use texnum::{
    expand_math, format_number, parse_literal, render_document, render_document_default,
    split_at_delimiters, Delimiter, Engine, ExpandError, InvocationContext, MacroArgument,
    MacroRule, MacroTable, RenderOptions, Segment, Sign,
};

// ============================================================================
// Number Formatting
// ============================================================================

mod numbers {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_grouping() {
        let cases = [
            ("1", "1"),
            ("1234", "1234"),
            ("12345", "12\\,345"),
            ("1234567", "1\\,234\\,567"),
            ("1234567.1234", "1\\,234\\,567.123\\,4"),
            ("0.000001", "0.000\\,001"),
        ];
        for (raw, expected) in cases {
            assert_eq!(format_number(raw), expected, "input {:?}", raw);
        }
    }

    #[test]
    fn test_exponents() {
        assert_eq!(format_number("1.5e3"), "1.5\\cdot 10^{3}");
        assert_eq!(format_number("1.5e0"), "1.5");
        assert_eq!(format_number("1.5e+3"), "1.5\\cdot 10^{3}");
        assert_eq!(format_number("1.5e-3"), "1.5\\cdot 10^{-3}");
        assert_eq!(format_number("12345e6"), "12\\,345\\cdot 10^{6}");
    }

    #[test]
    fn test_signs() {
        assert_eq!(format_number("\\pm 5"), "\\pm5");
        assert_eq!(format_number("\\\\pm5"), "\\pm5");
        assert_eq!(format_number("-12345"), "-12\\,345");
        assert_eq!(format_number("+0.5"), "+0.5");
        assert_eq!(parse_literal("\\pm 1.5").sign, Some(Sign::PlusMinus));
    }

    #[test]
    fn test_decimal_separator_preserved() {
        assert_eq!(format_number("1,5"), "1,5");
        assert_eq!(format_number("1.5"), "1.5");
        assert_eq!(format_number("12345,6789"), "12\\,345,678\\,9");
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        assert_eq!(format_number("  12345 \n"), "12\\,345");
    }

    #[test]
    fn test_malformed_input_never_fails() {
        assert_eq!(format_number(""), "");
        assert_eq!(format_number("abc"), "abc");
        assert_eq!(format_number("1.2.3"), "1.2.3");
        assert_eq!(format_number("e5"), "\\cdot 10^{5}");
    }
}

// ============================================================================
// Macro Expansion
// ============================================================================

mod expansion {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_quantities() {
        assert_eq!(
            expand_math("\\qty{1000}{\\volt}").unwrap(),
            "1000\\,\\mathrm{\\text{V}}"
        );
        assert_eq!(
            expand_math("\\qty{10000}{\\volt}").unwrap(),
            "10\\,000\\,\\mathrm{\\text{V}}"
        );
        assert_eq!(
            expand_math("\\qty{4.7}{\\kilo\\ohm}").unwrap(),
            "4.7\\,\\mathrm{\\text{k}\\Omega}"
        );
        assert_eq!(
            expand_math("\\qty{1.5e-3}{\\milli\\ampere}").unwrap(),
            "1.5\\cdot10^{-3}\\,\\mathrm{\\text{m}\\text{A}}"
        );
    }

    #[test]
    fn test_degree_units_attach() {
        assert_eq!(
            expand_math("\\qty{21.5}{\\degreeCelsius}").unwrap(),
            "21.5\\mathrm{\\,\\degree\\text{C}}"
        );
    }

    #[test]
    fn test_ranges() {
        assert_eq!(
            expand_math("\\qtyrange{1}{5}{\\kilo\\meter}").unwrap(),
            "1\\,\\text{--}\\,5\\,\\mathrm{\\text{k}\\text{m}}"
        );
        assert_eq!(
            expand_math("\\qtyrange{-10}{40}{\\degreeCelsius}").unwrap(),
            "-10\\,\\text{--}40\\mathrm{\\,\\degree\\text{C}}"
        );
    }

    #[test]
    fn test_units_with_unit_macro() {
        assert_eq!(
            expand_math("\\unit{\\meter\\per\\second}").unwrap(),
            "{\\mathrm{\\text{m}/\\text{s}}}"
        );
        assert_eq!(expand_math("\\num{50}\\percent").unwrap(), "50\\%");
    }

    #[test]
    fn test_composed_units_reexpand() {
        assert_eq!(expand_math("\\dBuV").unwrap(), "\\text{dB}\\text{μ}\\text{V}");
    }

    #[test]
    fn test_comma_handling() {
        assert_eq!(expand_math("f(x, y)").unwrap(), "f(x{\\char`,} y)");
        assert_eq!(expand_math("(1,2)").unwrap(), "(1\\char`,2)");
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            expand_math("\\qtyrange{1}{2}"),
            Err(ExpandError::MissingArgument {
                macro_name: "\\qtyrange".into(),
                expected: 3,
                found: 2
            })
        );
        assert_eq!(expand_math("\\qty{1}{\\volt"), Err(ExpandError::UnbalancedGroup));
    }

    #[test]
    fn test_recursive_user_macro() {
        let mut table = MacroTable::builtin();
        table.define("\\a", "\\b");
        table.define("\\b", "\\a");
        assert_eq!(
            Engine::new(&table).expand("\\a"),
            Err(ExpandError::TooManyExpansions { limit: 1000 })
        );
    }
}

// ============================================================================
// Macro Table
// ============================================================================

mod table {
    use super::*;
    use pretty_assertions::assert_eq;

    /// A host that hands out pre-collected arguments.
    struct FixedArgs(Vec<MacroArgument>);

    impl InvocationContext for FixedArgs {
        fn peek_token(&self) -> Option<&texnum::core::engine::token::TexToken> {
            None
        }

        fn consume_args(&mut self, count: usize) -> texnum::ExpandResult<Vec<MacroArgument>> {
            let n = count.min(self.0.len());
            Ok(self.0.drain(..n).collect())
        }
    }

    fn arg(text: &str) -> MacroArgument {
        MacroArgument::new(texnum::core::engine::lexer::tokenize(text))
    }

    #[test]
    fn test_computed_rule_with_foreign_host() {
        let table = MacroTable::builtin();
        let Some(MacroRule::Computed(qty)) = table.get("\\qty") else {
            panic!("\\qty should be computed");
        };
        let mut ctx = FixedArgs(vec![arg("1000"), arg("\\volt")]);
        assert_eq!(qty(&mut ctx).unwrap(), "1000\\,\\mathrm{\\volt}");
    }

    #[test]
    fn test_template_rules() {
        let table = MacroTable::builtin();
        assert_eq!(
            table.get("\\hertz").map(|r| r.to_string()).as_deref(),
            Some("\\text{Hz}")
        );
        assert_eq!(table.get("\\unit").and_then(|r| r.arity()), Some(1));
        assert!(table.get("\\frac").is_none());
    }

    #[test]
    fn test_names_are_sorted() {
        let table = MacroTable::builtin();
        let names = table.names();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(names.contains(&"\\num"));
        assert!(names.contains(&"\\tera"));
    }
}

// ============================================================================
// Document Rendering
// ============================================================================

mod documents {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mixed_document() {
        let doc = "The supply is $\\qty{12345}{\\volt}$, or\n$$\\num{1.5e3}$$\nin total.";
        assert_eq!(
            render_document_default(doc),
            "The supply is $12\\,345\\,\\mathrm{\\text{V}}$, or\n$$1.5\\cdot10^{3}$$\nin total."
        );
    }

    #[test]
    fn test_text_outside_math_untouched() {
        let doc = "Prices: 12345, 6789 and \\num{1}.";
        assert_eq!(render_document_default(doc), doc);
    }

    #[test]
    fn test_failing_region_kept_verbatim() {
        let report =
            render_document("a $\\qty{5}$ b \\(\\num{12345}\\)", &RenderOptions::default()).unwrap();
        assert_eq!(report.content, "a $\\qty{5}$ b \\(12\\,345\\)");
        assert!(report.has_warnings());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].message.contains("\\qty"));
    }

    #[test]
    fn test_strict_rendering_fails() {
        let result = render_document("a $\\qty{5}$ b", &RenderOptions::strict());
        assert!(matches!(result, Err(ExpandError::MissingArgument { .. })));
    }

    #[test]
    fn test_display_math_is_one_region() {
        let segments = split_at_delimiters("$$x$$", &texnum::default_delimiters());
        assert_eq!(segments.len(), 1);
        assert!(matches!(
            &segments[0],
            Segment::Math { content, delimiter, .. } if content == "x" && delimiter.display
        ));
    }

    #[test]
    fn test_custom_delimiters_and_macros() {
        let mut options = RenderOptions::new();
        options.delimiters = vec![Delimiter::new("@@", "@@", false)];
        options.macros.insert("\\V".into(), "\\qty{#1}{\\volt}".into());
        let report = render_document("$\\num{12345}$ @@\\V{230}@@", &options).unwrap();
        assert_eq!(report.content, "$\\num{12345}$ @@230\\,\\mathrm{\\text{V}}@@");
    }

    #[test]
    fn test_expansion_limit_from_options() {
        let mut options = RenderOptions::new();
        options.max_expansions = 1;
        let report = render_document("$\\qty{1}{\\volt}$", &options).unwrap();
        assert_eq!(report.content, "$\\qty{1}{\\volt}$");
        assert_eq!(report.warnings.len(), 1);
    }
}
