use super::*;

#[test]
fn default_scene_is_valid_and_sized_to_the_preset() {
    let cfg = SceneConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.layout.branching.stages, 7);
    assert_eq!(cfg.layout.column.stages, 7);
    assert_eq!(cfg.timeline().unwrap().step_count(), 7);
    assert_eq!(cfg.network().unwrap().lane_count(), 4);
}

#[test]
fn partial_json_falls_back_to_defaults() {
    let json = serde_json::json!({
        "process": {
            "stages": [
                {
                    "client": { "num": "01", "role": "Client", "title": "Kickoff" },
                    "studio": { "num": "01", "role": "Studio", "title": "Plan" },
                    "accent": "#60a5fa",
                    "label": "01 Kickoff"
                },
                {
                    "studio": { "num": "02", "role": "Studio", "title": "Ship" },
                    "accent": [255, 255, 255],
                    "label": "02 Ship",
                    "cue": "StudioFirst"
                }
            ]
        },
        "choreo": { "repeat_delay": 0.5 },
        "background": "#000000"
    });
    let cfg = SceneConfig::from_reader(json.to_string().as_bytes()).unwrap();
    assert_eq!(cfg.process.len(), 2);
    assert_eq!(cfg.layout.branching.stages, 2);
    assert_eq!(cfg.choreo.repeat_delay, 0.5);
    assert_eq!(cfg.choreo.gap, 0.18);
    assert_eq!(cfg.team, presets::studio_team());
    assert_eq!(cfg.background, Rgba8::BLACK);
    assert_eq!(cfg.timeline().unwrap().repeat_delay(), 0.5);
}

#[test]
fn invalid_sections_are_rejected() {
    let bad_flow = serde_json::json!({ "flow": { "speed": -3.0 } });
    let err = SceneConfig::from_reader(bad_flow.to_string().as_bytes()).unwrap_err();
    assert!(matches!(err, FlowlineError::Validation(_)));

    let bad_fps = serde_json::json!({ "fps": { "num": 30, "den": 0 } });
    assert!(SceneConfig::from_reader(bad_fps.to_string().as_bytes()).is_err());

    let err = SceneConfig::from_reader("{ not json".as_bytes()).unwrap_err();
    assert!(matches!(err, FlowlineError::Serde(_)));
}

#[test]
fn missing_file_is_a_validation_error() {
    let err = SceneConfig::from_path("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("open scene JSON"));
}
