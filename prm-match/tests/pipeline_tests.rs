//! End-to-end pipeline tests: JSON fixtures on disk through report output.

use prm_common::MatchingConfig;
use prm_match::{assignment, calibration, io, matrix, quality, reports};
use std::path::Path;

fn write_fixture(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn persona_json(age: u32) -> String {
    format!(
        r#"{{
            "id": "persona-{age}",
            "semantic_tree": {{
                "demographics": {{"age": {age}, "location_type": "urban"}},
                "socioeconomic": {{
                    "education_level": "bachelors",
                    "income_bracket": "middle",
                    "occupation_category": "teacher"
                }},
                "health_profile": {{
                    "health_consciousness": 4,
                    "healthcare_access": 3,
                    "pregnancy_readiness": 4
                }},
                "behavioral": {{"physical_activity": 4, "smoking_status": "never"}},
                "psychosocial": {{
                    "marital_status": "married",
                    "relationship_stability": 4,
                    "financial_stress": 2,
                    "social_support": 4
                }},
                "pregnancy_intentions": {{"gravida": 1, "para": 1, "trying_duration_months": 6}}
            }}
        }}"#
    )
}

fn record_json(age: u32) -> String {
    format!(
        r#"{{
            "age": {age},
            "conditions": [
                {{"code": "Z34.0", "category": "pregnancy_related", "severity": 1, "pregnancy_relevance": 5}}
            ],
            "condition_categories": {{"pregnancy_related": 1}},
            "chronic_disease_count": 0,
            "acute_condition_count": 0,
            "comorbidity_index": 0.1,
            "medication_profile": {{"categories": ["prenatal_vitamins"], "pregnancy_safety": "safe", "count": 1}},
            "healthcare_utilization": {{
                "visit_frequency": "regular",
                "primary_care_engagement": 4,
                "specialist_utilization": 2,
                "preventive_care_visits": 3,
                "emergency_visits": 0,
                "inpatient_admissions": 0,
                "estimated_healthcare_access": 3
            }},
            "pregnancy_profile": {{
                "has_pregnancy_codes": true,
                "stage": "second_trimester",
                "risk_level": 2,
                "gestational_age_weeks": 21.0
            }},
            "overall_health_status": "good"
        }}"#
    )
}

fn pools_json(persona_ages: &[u32], record_ages: &[u32]) -> (String, String) {
    let personas = persona_ages
        .iter()
        .map(|&a| persona_json(a))
        .collect::<Vec<_>>()
        .join(",");
    let records = record_ages
        .iter()
        .map(|&a| record_json(a))
        .collect::<Vec<_>>()
        .join(",");
    (format!("[{personas}]"), format!("[{records}]"))
}

#[test]
fn full_pipeline_writes_all_reports() {
    let dir = tempfile::tempdir().unwrap();
    let (personas_json, records_json) = pools_json(&[26, 31, 35], &[27, 30, 36]);
    let personas_path = write_fixture(dir.path(), "personas.json", &personas_json);
    let records_path = write_fixture(dir.path(), "health_records.json", &records_json);

    let config = MatchingConfig::default();
    let personas = io::load_personas(&personas_path).unwrap();
    let records = io::load_health_records(&records_path).unwrap();

    let matrix = matrix::build_matrix(&personas.items, &records.items, &config);
    let assignment = assignment::solve(&matrix);
    assert_eq!(assignment.pairs.len(), 3);

    let matches = quality::classify_matches(&assignment, &matrix, &personas.items, &records.items);
    let statistics = quality::compute_statistics(&matches);
    assert_eq!(statistics.match_count, 3);

    reports::write_matched_personas(
        dir.path(),
        &matches,
        &personas.items,
        &assignment.unmatched_personas,
        &assignment.unmatched_records,
        &config,
    )
    .unwrap();
    reports::write_quality_metrics(dir.path(), &matches).unwrap();
    reports::write_statistics(dir.path(), &statistics, 3, 3, &config).unwrap();

    let calibration_report = calibration::calibrate(matrix.all_scores(), &matrix.best_match_scores());
    reports::write_calibration_report(dir.path(), &calibration_report).unwrap();

    let persona_ages: Vec<Option<u32>> = personas
        .items
        .iter()
        .map(|p| p.semantic_tree.as_ref().and_then(|t| t.demographics.age))
        .collect();
    let record_ages: Vec<Option<u32>> = records.items.iter().map(|r| r.age).collect();
    let validation = calibration::validate_threshold(
        &matrix,
        &persona_ages,
        &record_ages,
        calibration_report.recommended_threshold,
    );
    reports::write_validation_report(dir.path(), &validation).unwrap();

    for file in [
        reports::MATCHED_PERSONAS_FILE,
        reports::QUALITY_METRICS_FILE,
        reports::STATISTICS_FILE,
        reports::CALIBRATION_FILE,
        reports::VALIDATION_FILE,
    ] {
        let content = std::fs::read_to_string(dir.path().join(file)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert!(value["generated_at"].is_string(), "{} missing timestamp", file);
    }
}

#[test]
fn pipeline_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let (personas_json, records_json) = pools_json(&[24, 29, 33, 41], &[25, 30, 40]);
    let personas_path = write_fixture(dir.path(), "personas.json", &personas_json);
    let records_path = write_fixture(dir.path(), "health_records.json", &records_json);

    let config = MatchingConfig::default();
    let mut previous: Option<Vec<(usize, usize, f64)>> = None;
    for _ in 0..3 {
        let personas = io::load_personas(&personas_path).unwrap();
        let records = io::load_health_records(&records_path).unwrap();
        let matrix = matrix::build_matrix(&personas.items, &records.items, &config);
        let assignment = assignment::solve(&matrix);
        if let Some(prev) = &previous {
            assert_eq!(prev, &assignment.pairs);
        }
        previous = Some(assignment.pairs);
    }
}

#[test]
fn self_match_scores_above_point_eight() {
    // Persona and record built to represent the same underlying profile
    let dir = tempfile::tempdir().unwrap();
    let (personas_json, records_json) = pools_json(&[30], &[30]);
    let personas_path = write_fixture(dir.path(), "personas.json", &personas_json);
    let records_path = write_fixture(dir.path(), "health_records.json", &records_json);

    let personas = io::load_personas(&personas_path).unwrap();
    let records = io::load_health_records(&records_path).unwrap();
    let matrix = matrix::build_matrix(&personas.items, &records.items, &MatchingConfig::default());

    assert!(
        matrix.score(0, 0) > 0.8,
        "self-match scored {}",
        matrix.score(0, 0)
    );
}

#[test]
fn rectangular_pools_match_min_cardinality() {
    let dir = tempfile::tempdir().unwrap();

    // N=5 personas, M=3 records: exactly 3 matches, 2 personas unmatched
    let (personas_json, records_json) = pools_json(&[22, 26, 30, 34, 38], &[23, 29, 37]);
    let personas_path = write_fixture(dir.path(), "p5.json", &personas_json);
    let records_path = write_fixture(dir.path(), "r3.json", &records_json);
    let personas = io::load_personas(&personas_path).unwrap();
    let records = io::load_health_records(&records_path).unwrap();
    let matrix = matrix::build_matrix(&personas.items, &records.items, &MatchingConfig::default());
    let assignment = assignment::solve(&matrix);
    assert_eq!(assignment.pairs.len(), 3);
    assert_eq!(assignment.unmatched_personas.len(), 2);
    assert!(assignment.unmatched_records.is_empty());

    // N=3, M=5: exactly 3 matches, 2 records unmatched
    let (personas_json, records_json) = pools_json(&[22, 26, 30], &[23, 29, 37, 41, 45]);
    let personas_path = write_fixture(dir.path(), "p3.json", &personas_json);
    let records_path = write_fixture(dir.path(), "r5.json", &records_json);
    let personas = io::load_personas(&personas_path).unwrap();
    let records = io::load_health_records(&records_path).unwrap();
    let matrix = matrix::build_matrix(&personas.items, &records.items, &MatchingConfig::default());
    let assignment = assignment::solve(&matrix);
    assert_eq!(assignment.pairs.len(), 3);
    assert!(assignment.unmatched_personas.is_empty());
    assert_eq!(assignment.unmatched_records.len(), 2);
}

#[test]
fn demographic_only_age_scenario() {
    // personas [30, 25], records [30, 50]: the straight pairing wins
    let dir = tempfile::tempdir().unwrap();
    let (personas_json, records_json) = pools_json(&[30, 25], &[30, 50]);
    let personas_path = write_fixture(dir.path(), "personas.json", &personas_json);
    let records_path = write_fixture(dir.path(), "health_records.json", &records_json);

    let config = MatchingConfig {
        semantic_weight: 0.0,
        ..Default::default()
    };
    let personas = io::load_personas(&personas_path).unwrap();
    let records = io::load_health_records(&records_path).unwrap();
    let matrix = matrix::build_matrix(&personas.items, &records.items, &config);
    let assignment = assignment::solve(&matrix);

    assert_eq!(assignment.pairs.len(), 2);
    assert_eq!((assignment.pairs[0].0, assignment.pairs[0].1), (0, 0));
    assert_eq!((assignment.pairs[1].0, assignment.pairs[1].1), (1, 1));
}

#[test]
fn all_scores_stay_in_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let (personas_json, records_json) =
        pools_json(&[12, 20, 30, 45, 60], &[15, 25, 35, 50, 58]);
    let personas_path = write_fixture(dir.path(), "personas.json", &personas_json);
    let records_path = write_fixture(dir.path(), "health_records.json", &records_json);

    for weight in [0.0, 0.3, 0.6, 1.0] {
        let config = MatchingConfig {
            semantic_weight: weight,
            ..Default::default()
        };
        let personas = io::load_personas(&personas_path).unwrap();
        let records = io::load_health_records(&records_path).unwrap();
        let matrix = matrix::build_matrix(&personas.items, &records.items, &config);
        for &score in matrix.all_scores() {
            assert!((0.0..=1.0).contains(&score), "score {} out of bounds", score);
        }
    }
}
