use score_sheet::extract::Mode;
use score_sheet::grid::to_score;
use score_sheet::Extraction;
use score_sheet::Extractor;
use score_sheet::GateError;
use score_sheet::Grid;
use score_sheet::ScoreSheetError;

fn extract(rows: &[Vec<&str>]) -> Result<Extraction, ScoreSheetError> {
    Extractor::default().extract(&Grid::from_texts(rows), "Sheet1")
}

fn scores(extraction: &Extraction) -> Vec<(&str, Option<u32>, Option<u32>, Option<u32>)> {
    extraction
        .records
        .iter()
        .map(|record| (record.name.as_str(), record.usual_score, record.exam_score, record.final_score))
        .collect()
}

#[test]
fn scenario_a_single_header_table() -> Result<(), ScoreSheetError> {
    let extraction = extract(&[vec!["姓名", "学号", "平时成绩", "考试成绩"], vec!["张三", "1", "88", "82"]])?;
    assert_eq!(extraction.meta.mode, Mode::Table);
    assert_eq!(scores(&extraction), vec![("张三", Some(88), Some(82), Some(170))]);
    assert_eq!(extraction.validate(), Ok(()));
    Ok(())
}

#[test]
fn scenario_b_no_score_columns() -> Result<(), ScoreSheetError> {
    let extraction = extract(&[vec!["姓名", "学号", "成绩"], vec!["张三", "1", "88"]])?;
    let error = extraction.validate().unwrap_err();
    assert!(matches!(error, GateError::MissingColumns { has_usual: false, has_exam: false, .. }));
    let message = error.to_string();
    assert!(message.contains("neither the usual-score nor the exam-score column"), "{message}");
    assert!(message.contains("\"学号\""), "{message}");
    Ok(())
}

#[test]
fn scenario_c_double_column_table() -> Result<(), ScoreSheetError> {
    let extraction = extract(&[
        vec!["序号", "姓名", "平时", "考试", "", "序号", "姓名", "平时", "考试"],
        vec!["1", "张三", "88", "82", "", "2", "李四", "90", "85"],
    ])?;
    assert_eq!(extraction.meta.split_column, Some(5));
    assert_eq!(
        scores(&extraction),
        vec![("张三", Some(88), Some(82), Some(170)), ("李四", Some(90), Some(85), Some(175))]
    );
    assert_eq!(extraction.validate(), Ok(()));
    Ok(())
}

#[test]
fn scenario_d_weighted_report() -> Result<(), ScoreSheetError> {
    let extraction = extract(&[
        vec!["序号", "姓名", "", ""],
        vec!["", "", "平时", "考试"],
        vec!["", "", "0.6", "0.4"],
        vec!["1", "张三", "90", "90"],
    ])?;
    assert_eq!(extraction.meta.mode, Mode::Report);
    assert_eq!(scores(&extraction), vec![("张三", Some(54), Some(36), Some(90))]);
    assert_eq!(extraction.validate(), Ok(()));
    Ok(())
}

#[test]
fn extraction_is_idempotent() -> Result<(), ScoreSheetError> {
    let grid = Grid::from_texts(&[
        vec!["成绩报告单", "", "", "", "", ""],
        vec!["班级：会计1班", "", "课程：语文", "", "", ""],
        vec!["姓名", "", "", "姓名", "", ""],
        vec!["", "平时", "考试", "", "平时", "考试"],
        vec!["张三", "80", "70", "李四", "90", ""],
        vec!["王五", "缺考", "", "赵六", "60", "65"],
    ]);
    let extractor = Extractor::default();
    let first = extractor.extract(&grid, "Sheet1")?;
    let second = extractor.extract(&grid, "Sheet1")?;
    assert_eq!(first, second);
    assert_eq!(first.records.len(), 3);
    Ok(())
}

#[test]
fn weights_outside_tolerance_fall_back_to_raw_scores() -> Result<(), ScoreSheetError> {
    for (usual, exam, expected) in [
        ("0.6", "0.41", (Some(54), Some(37))),
        ("0.7", "0.5", (Some(90), Some(90))),
        ("0.5", "0.52", (Some(90), Some(90))),
    ] {
        let extraction = extract(&[
            vec!["姓名", "", ""],
            vec!["", "平时", "考试"],
            vec!["", usual, exam],
            vec!["张三", "90", "90"],
        ])?;
        for group in &extraction.meta.groups {
            if let Some(weights) = group.weights {
                assert!((weights.usual + weights.exam - 1.0).abs() < 0.02);
            }
        }
        let record = &extraction.records[0];
        assert_eq!((record.usual_score, record.exam_score), expected, "{usual}/{exam}");
    }
    Ok(())
}

#[test]
fn gate_refuses_grids_missing_a_score_column() -> Result<(), ScoreSheetError> {
    let grids = [
        vec![vec!["姓名", "平时成绩"], vec!["张三", "88"]],
        vec![vec!["姓名", "考试成绩"], vec!["张三", "88"]],
        vec![vec!["姓名", "备注"], vec!["张三", "88"]],
        vec![vec!["姓名", ""], vec!["", "平时"], vec!["张三", "88"]],
        vec![vec!["序号", "姓名", "平时", "", "序号", "姓名", "考试"], vec!["1", "张三", "80", "", "2", "李四", "70"]],
    ];
    for rows in grids {
        let extraction = extract(&rows)?;
        assert!(
            matches!(extraction.validate(), Err(GateError::MissingColumns { .. })),
            "{:?}",
            extraction.meta.raw_columns
        );
    }
    Ok(())
}

#[test]
fn filtered_to_nothing_reports_sample() -> Result<(), ScoreSheetError> {
    let extraction = extract(&[vec!["姓名", "平时成绩", "考试成绩"], vec!["张三", "缺考", "缓考"]])?;
    let message = extraction.validate().unwrap_err().to_string();
    assert!(message.contains("all 1 candidate row(s)"), "{message}");
    assert!(message.contains("'张三'"), "{message}");
    Ok(())
}

#[test]
fn scores_are_clamped_and_rounded() {
    for value in [-20.0, -0.4, 0.0, 0.4, 59.6, 99.49, 100.0, 100.4, 250.0, f64::MAX] {
        let score = to_score(value);
        assert_eq!(score, Some(value.clamp(0.0, 100.0).round() as u32), "{value}");
        assert!(score.is_some_and(|score| score <= 100));
    }
    for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        assert_eq!(to_score(value), None);
    }
}

#[test]
fn last_occurrence_wins() -> Result<(), ScoreSheetError> {
    let extraction = extract(&[
        vec!["姓名", "平时成绩", "考试成绩"],
        vec!["张三", "60", "50"],
        vec!["李四", "70", "75"],
        vec!["张三", "65", "55"],
    ])?;
    assert_eq!(
        scores(&extraction),
        vec![("张三", Some(65), Some(55), Some(120)), ("李四", Some(70), Some(75), Some(145))]
    );
    assert_eq!(extraction.records[0].source_row, 4);
    assert_eq!(extraction.meta.filter.replaced, 1);
    Ok(())
}

#[test]
fn missing_name_header_is_fatal() {
    let error = extract(&[vec!["学号", "平时成绩"], vec!["1", "88"]]).unwrap_err();
    assert!(matches!(error, ScoreSheetError::NameHeaderNotFound { .. }));
}

#[test]
fn three_name_columns_pair_with_their_own_scores() -> Result<(), ScoreSheetError> {
    let extraction = extract(&[
        vec!["姓名", "", "", "姓名", "", "", "姓名", "", ""],
        vec!["", "平时", "考试", "", "平时", "考试", "", "平时", "考试"],
        vec!["张三", "81", "71", "李四", "82", "72", "王五", "83", "73"],
        vec!["赵六", "84", "74", "钱七", "85", "75", "孙八", "86", "76"],
    ])?;
    assert_eq!(extraction.meta.mode, Mode::Report);
    assert_eq!(extraction.meta.name_columns, vec![0, 3, 6]);
    let groups: Vec<(usize, usize, usize)> =
        extraction.meta.groups.iter().map(|group| (group.name_col, group.usual_col, group.exam_col)).collect();
    assert_eq!(groups, vec![(0, 1, 2), (3, 4, 5), (6, 7, 8)]);
    assert_eq!(
        scores(&extraction),
        vec![
            ("张三", Some(81), Some(71), Some(152)),
            ("李四", Some(82), Some(72), Some(154)),
            ("王五", Some(83), Some(73), Some(156)),
            ("赵六", Some(84), Some(74), Some(158)),
            ("钱七", Some(85), Some(75), Some(160)),
            ("孙八", Some(86), Some(76), Some(162)),
        ]
    );
    assert_eq!(extraction.validate(), Ok(()));
    Ok(())
}

#[test]
fn trailing_notes_column_passes_the_gate() -> Result<(), ScoreSheetError> {
    let extraction = extract(&[vec!["姓名", "平时成绩", "考试成绩", "", "备注"], vec!["张三", "88", "82", "", "良好"]])?;
    assert_eq!(extraction.meta.mode, Mode::Table);
    assert_eq!(extraction.meta.split_column, None);
    assert_eq!(scores(&extraction), vec![("张三", Some(88), Some(82), Some(170))]);
    assert_eq!(extraction.validate(), Ok(()));
    Ok(())
}
