use cross_probability::{
    evaluate, evaluate_with, CrossError, CrossEvaluator, CrossOutcome, CrossReport,
    InheritanceMode, Infeasibility, Odds, Renderer, ReportFormat, SymbolMap, SymbolTable,
};

#[test]
fn test_documented_crosses() {
    assert!(evaluate("D", "D", "H").unwrap().is_impossible());
    assert_eq!(evaluate("H", "H", "D").unwrap().denominator(), Some(4));
    assert_eq!(evaluate("H", "H", "H").unwrap().denominator(), Some(2));
    assert_eq!(evaluate("D", "H", "H").unwrap().denominator(), Some(2));
    assert_eq!(evaluate("D", "R", "H").unwrap().denominator(), Some(1));
    assert_eq!(evaluate("HH", "HH", "DD").unwrap().denominator(), Some(16));
    assert!(matches!(
        evaluate("HH", "HD", ""),
        Err(CrossError::LengthMismatch { .. })
    ));
    assert!(matches!(
        evaluate("HX", "HH", "HH"),
        Err(CrossError::InvalidCharacter { .. })
    ));
    assert_eq!(evaluate("hh", "Hh", "hH"), evaluate("HH", "HH", "HH"));
}

#[test]
fn test_homozygous_parent_blocks_opposite_target_at_any_locus() {
    let filler = ["H", "D", "R"];
    for before in filler {
        for after in filler {
            let p1 = format!("{}D{}", before, after);
            let p2 = format!("{}H{}", before, after);
            let target = format!("{}R{}", before, after);
            let outcome = evaluate(&p1, &p2, &target).unwrap();
            assert!(outcome.is_impossible(), "{} x {} -> {}", p1, p2, target);

            let p1 = format!("{}H{}", before, after);
            let p2 = format!("{}R{}", before, after);
            let target = format!("{}D{}", before, after);
            let outcome = evaluate(&p1, &p2, &target).unwrap();
            assert!(outcome.is_impossible(), "{} x {} -> {}", p1, p2, target);
        }
    }
}

#[test]
fn test_parent_order_does_not_matter() {
    let states = ["H", "D", "R"];
    for a in states {
        for b in states {
            for t in states {
                assert_eq!(
                    evaluate(a, b, t).unwrap().odds(),
                    evaluate(b, a, t).unwrap().odds(),
                    "{} x {} -> {}",
                    a,
                    b,
                    t
                );
            }
        }
    }
}

#[test]
fn test_mendelian_dihybrid_cross() {
    // AaBb x AaBb: 1/16 AABB, 1/4 AaBb
    assert_eq!(
        evaluate("HH", "HH", "DD").unwrap(),
        CrossOutcome::Probability(Odds::from_division_count(4))
    );
    assert_eq!(evaluate("HH", "HH", "HH").unwrap().denominator(), Some(4));
    assert_eq!(
        evaluate("DR", "RD", "RR").unwrap(),
        CrossOutcome::Impossible {
            locus: 0,
            reason: Infeasibility::DominantParentRecessiveTarget,
        }
    );
}

#[test]
fn test_incomplete_dominance_snapdragons() {
    let symbols = SymbolTable::new(SymbolMap::parse("R=D,W=R,P=H").unwrap());
    let evaluator = CrossEvaluator::with_symbols(symbols.clone());

    // pink x pink: 1/4 red, 1/4 white, 1/2 pink
    assert_eq!(evaluator.evaluate("P", "P", "R").unwrap().denominator(), Some(4));
    assert_eq!(evaluator.evaluate("P", "P", "W").unwrap().denominator(), Some(4));
    assert_eq!(evaluator.evaluate("P", "P", "P").unwrap().denominator(), Some(2));
    assert_eq!(
        evaluate_with(&symbols, "RW", "WR", "PP").unwrap().denominator(),
        Some(1)
    );
}

#[test]
fn test_report_end_to_end() {
    let result = evaluate("HDR", "HHR", "DDR");
    let report = CrossReport::new(["HDR", "HHR", "DDR"], InheritanceMode::Basic, &result);

    let text = Renderer::plain()
        .render_report(&report, ReportFormat::Text)
        .unwrap();
    assert_eq!(text, "result: target found in 1/8 offspring 12.5%");
    assert!(!report.is_error());
}
