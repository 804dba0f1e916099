//! Pointer operators over real object tables.

use crate::common::*;
use ptrcalc::*;

mod scaling {
    use super::*;

    #[test]
    fn test_offsets_scale_by_layout() {
        for (layout, int_size) in [(DataLayout::word64(), 8), (DataLayout::lp64(), 4), (DataLayout::ilp32(), 4)] {
            // Arrange
            let table = objects(layout, &[("arr", "int[10]")]);
            let eval = PointerEvaluator::new(&table);
            let base = first(&table, "arr");

            // Act
            let p = eval.eval_pointer_add(base, 3).unwrap();

            // Assert
            assert_eq!(p.offset(), 3 * int_size);
            assert_eq!(eval.eval_pointer_diff(p, base), Ok(3));
        }
    }

    #[test]
    fn test_char_pointers_move_by_bytes() {
        let table = objects(DataLayout::word64(), &[("s", "char[16]")]);
        let eval = PointerEvaluator::new(&table);
        let base = first(&table, "s");

        let p = eval.eval_int_add_pointer(5, base).unwrap();

        assert_eq!(p.offset(), 5);
        assert_eq!(eval.eval_pointer_diff(p, base), Ok(5));
    }

    #[test]
    fn test_pointer_to_pointer_elements() {
        let table = objects(DataLayout::ilp32(), &[("argv", "char*[4]")]);
        let eval = PointerEvaluator::new(&table);
        let base = first(&table, "argv");

        let last = eval.eval_index(base, 3).unwrap();

        assert_eq!(last.element_size(), 4);
        assert_eq!(last.offset(), 12);
        assert!(eval.check_dereference(last).is_ok());
    }

    #[test]
    fn test_pointer_to_whole_array_steps_over_it() {
        // int (*row)[4] = &grid;  row + 1 is one past the whole array.
        let table = objects(DataLayout::lp64(), &[("grid", "int[4]")]);
        let eval = PointerEvaluator::new(&table);
        let row = addr(&table, "grid");

        let end = eval.eval_pointer_add(row, 1).unwrap();

        assert_eq!(row.element_size(), 16);
        assert_eq!(end.offset(), 16);
        assert!(eval.eval_pointer_add(row, 2).is_err());
    }
}

mod bounds {
    use super::*;

    #[test]
    fn test_one_past_the_end_is_valid_but_not_dereferenceable() {
        let table = objects(DataLayout::lp64(), &[("arr", "long[3]")]);
        let eval = PointerEvaluator::new(&table);
        let base = first(&table, "arr");

        let end = eval.eval_pointer_add(base, 3).unwrap();

        assert_eq!(end.offset(), 24);
        assert!(matches!(
            eval.check_dereference(end),
            Err(Diagnostic::InvalidDereference { .. })
        ));
    }

    #[test]
    fn test_before_the_start_is_out_of_bounds() {
        let table = objects(DataLayout::lp64(), &[("arr", "int[3]")]);
        let eval = PointerEvaluator::new(&table);
        let base = first(&table, "arr");

        let result = eval.eval_pointer_sub(base, 1);

        assert_eq!(
            result,
            Err(Diagnostic::OutOfBounds { object: base.object(), offset: -4, length: 12 })
        );
    }

    #[test]
    fn test_huge_counts_overflow_instead_of_wrapping() {
        let table = objects(DataLayout::word64(), &[("arr", "long[2]")]);
        let eval = PointerEvaluator::new(&table);
        let base = first(&table, "arr");

        let result = eval.eval_pointer_add(base, i64::MAX);

        assert!(matches!(result, Err(Diagnostic::IntegerOverflow { .. })));
    }

    #[test]
    fn test_subtracting_i64_min_is_reported() {
        let table = objects(DataLayout::word64(), &[("arr", "char[2]")]);
        let eval = PointerEvaluator::new(&table);
        let base = first(&table, "arr");

        assert!(eval.eval_pointer_sub(base, i64::MIN).is_err());
    }
}

mod provenance {
    use super::*;

    #[test]
    fn test_distinct_objects_do_not_subtract() {
        let table = objects(DataLayout::lp64(), &[("x", "int"), ("y", "int")]);
        let eval = PointerEvaluator::new(&table);

        let result = eval.eval_pointer_diff(addr(&table, "y"), addr(&table, "x"));

        let err = result.unwrap_err();
        assert_eq!(err.code(), 2001);
        assert_eq!(err.category(), DiagnosticCategory::Provenance);
    }

    #[test]
    fn test_distinct_objects_compare_unequal_but_not_ordered() {
        let table = objects(DataLayout::lp64(), &[("x", "int"), ("y", "int")]);
        let eval = PointerEvaluator::new(&table);
        let (px, py) = (addr(&table, "x"), addr(&table, "y"));

        assert_eq!(eval.eval_pointer_compare(CompareOp::Eq, px, py), Ok(false));
        assert_eq!(eval.eval_pointer_compare(CompareOp::Ne, px, py), Ok(true));
        for op in [CompareOp::Lt, CompareOp::Le, CompareOp::Gt, CompareOp::Ge] {
            assert!(matches!(
                eval.eval_pointer_compare(op, px, py),
                Err(Diagnostic::InvalidPointerComparison { .. })
            ));
        }
    }

    #[test]
    fn test_mismatched_element_sizes_do_not_subtract() {
        let table = objects(DataLayout::lp64(), &[("buf", "int[8]")]);
        let eval = PointerEvaluator::new(&table);
        let ints = first(&table, "buf");
        let bytes = ints.with_element_size(1).unwrap();

        let result = eval.eval_pointer_diff(ints, bytes);

        assert!(matches!(
            result,
            Err(Diagnostic::InvalidPointerSubtraction {
                reason: SubtractionMismatch::ElementSize { .. }
            })
        ));
    }

    #[test]
    fn test_misaligned_difference_is_reported() {
        // A char pointer walked three bytes in, then viewed as an int pointer.
        let table = objects(DataLayout::lp64(), &[("buf", "int[8]")]);
        let eval = PointerEvaluator::new(&table);
        let ints = first(&table, "buf");
        let bytes = ints.with_element_size(1).unwrap();
        let skewed = eval.eval_pointer_add(bytes, 3).unwrap().with_element_size(4).unwrap();

        let result = eval.eval_pointer_diff(skewed, ints);

        assert!(matches!(result, Err(Diagnostic::MisalignedPointer { .. })));
    }
}

mod dispatch {
    use super::*;

    #[test]
    fn test_int_minus_pointer_is_unsupported() {
        let table = objects(DataLayout::lp64(), &[("arr", "int[4]")]);
        let eval = PointerEvaluator::new(&table);
        let p = Value::Pointer(first(&table, "arr"));

        let result = eval.eval_binary(BinaryOp::Sub, Value::Int(1), p);

        assert!(matches!(result, Err(Diagnostic::UnsupportedOperands { .. })));
    }

    #[test]
    fn test_pointer_plus_pointer_is_unsupported() {
        let table = objects(DataLayout::lp64(), &[("arr", "int[4]")]);
        let eval = PointerEvaluator::new(&table);
        let p = Value::Pointer(first(&table, "arr"));

        assert!(eval.eval_binary(BinaryOp::Add, p, p).is_err());
    }

    #[test]
    fn test_comparison_yields_int_truth_value() {
        let table = objects(DataLayout::lp64(), &[("arr", "int[4]")]);
        let eval = PointerEvaluator::new(&table);
        let base = first(&table, "arr");
        let p = Value::Pointer(base);
        let q = Value::Pointer(eval.eval_pointer_add(base, 2).unwrap());

        assert_eq!(eval.eval_binary(BinaryOp::Compare(CompareOp::Gt), q, p), Ok(Value::Int(1)));
        assert_eq!(eval.eval_binary(BinaryOp::Compare(CompareOp::Gt), p, q), Ok(Value::Int(0)));
    }
}

mod reporting {
    use super::*;

    #[test]
    fn test_strict_reporter_stops_on_first_diagnostic() {
        let table = objects(DataLayout::lp64(), &[("x", "int"), ("y", "int")]);
        let eval = PointerEvaluator::new(&table);
        let mut reporter = DiagnosticReporter::new(&EvalConfig::strict());

        let err = eval.eval_pointer_diff(addr(&table, "x"), addr(&table, "y")).unwrap_err();
        let action = reporter.record(err, SourceLocation::at_step(1));

        assert_eq!(action, ReportAction::Stop);
        assert_eq!(reporter.reports().len(), 1);
    }

    #[test]
    fn test_collecting_reporter_groups_by_category() {
        let table = objects(DataLayout::lp64(), &[("x", "int"), ("y", "int")]);
        let eval = PointerEvaluator::new(&table);
        let (px, py) = (addr(&table, "x"), addr(&table, "y"));
        let mut reporter = DiagnosticReporter::new(&EvalConfig::collecting());

        let failures = [
            eval.eval_pointer_diff(px, py).err(),
            eval.eval_pointer_add(px, 5).err(),
            eval.eval_pointer_compare(CompareOp::Gt, px, py).err(),
        ];
        for (step, err) in failures.into_iter().enumerate() {
            let action = reporter.record(err.unwrap(), SourceLocation::at_step(step + 1));
            assert_eq!(action, ReportAction::Continue);
        }

        let summary = reporter.summary();
        assert_eq!(summary.get(&DiagnosticCategory::Provenance), Some(&2));
        assert_eq!(summary.get(&DiagnosticCategory::Bounds), Some(&1));
        assert!(reporter.into_result(()).is_err());
    }
}
