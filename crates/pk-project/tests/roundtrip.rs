use pk_project::schema::*;
use pk_project::{load_json, load_yaml, save_json, save_yaml, validate_project};

fn sample_project() -> Project {
    Project {
        version: 1,
        name: "Roundtrip".to_string(),
        solver: SolverDef {
            sum_rounding_decimals: Some(8),
            ..SolverDef::default()
        },
        cores: vec![CoreDef {
            id: "core".to_string(),
            name: "One group".to_string(),
            generation_time_s: 1e-4,
            groups: vec![GroupDef {
                decay_constant_per_s: 0.0767,
                yield_fraction: 0.0065,
            }],
        }],
        scenarios: vec![
            ScenarioDef {
                id: "ramp".to_string(),
                name: "Ramp".to_string(),
                core_id: "core".to_string(),
                initial: InitialStateDef {
                    neutron_density: 1.0,
                    precursors: PrecursorInitDef::Equilibrium,
                },
                program: ProgramDef::Ramp {
                    slope_dollars_per_s: 0.05,
                    initial_reactivity: Some(ReactivityDef::absolute(1e-4)),
                    horizon_s: 1.0,
                    dt_s: 0.01,
                },
            },
            ScenarioDef {
                id: "step".to_string(),
                name: String::new(),
                core_id: "core".to_string(),
                initial: InitialStateDef {
                    neutron_density: 2.0,
                    precursors: PrecursorInitDef::Explicit { values: vec![50.0] },
                },
                program: ProgramDef::Insertion {
                    reactivity: ReactivityDef::dollars(-0.5),
                    time_s: 3.0,
                },
            },
        ],
    }
}

#[test]
fn roundtrip_yaml_empty_project() {
    let project = Project {
        version: 1,
        name: "Empty Project".to_string(),
        solver: SolverDef::default(),
        cores: vec![],
        scenarios: vec![],
    };

    validate_project(&project).unwrap();

    let path = std::env::temp_dir().join("pk_project_roundtrip_empty.yaml");
    save_yaml(&path, &project).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(project, loaded);
}

#[test]
fn roundtrip_yaml_scenarios() {
    let project = sample_project();
    let path = std::env::temp_dir().join("pk_project_roundtrip_scenarios.yaml");

    save_yaml(&path, &project).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(project, loaded);
    assert_eq!(loaded.scenario("step").unwrap().display_name(), "step");
}

#[test]
fn roundtrip_json_scenarios() {
    let project = sample_project();
    let path = std::env::temp_dir().join("pk_project_roundtrip_scenarios.json");

    save_json(&path, &project).unwrap();
    let loaded = load_json(&path).unwrap();

    assert_eq!(project, loaded);
}

#[test]
fn save_refuses_invalid_project() {
    let mut project = sample_project();
    project.scenarios[1].core_id = "missing".to_string();
    let path = std::env::temp_dir().join("pk_project_invalid.yaml");
    assert!(save_yaml(&path, &project).is_err());
}

#[test]
fn minimal_yaml_uses_defaults() {
    let yaml = r#"
version: 1
name: Defaults
cores:
  - id: c
    name: c
    generation_time_s: 1.0e-4
    groups:
      - { decay_constant_per_s: 0.08, yield_fraction: 0.0065 }
scenarios:
  - id: s
    core_id: c
    initial: { neutron_density: 1.0 }
    program: { type: Insertion, reactivity: { unit: Absolute, value: 0.001 }, time_s: 1.0 }
"#;
    let project: Project = serde_yaml::from_str(yaml).unwrap();
    validate_project(&project).unwrap();

    assert_eq!(project.solver, SolverDef::default());
    let s = project.scenario("s").unwrap();
    assert_eq!(s.initial.precursors, PrecursorInitDef::Equilibrium);
    assert_eq!(s.program.kind(), "Insertion");
}
