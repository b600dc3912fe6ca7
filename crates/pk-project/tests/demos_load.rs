use std::path::Path;

#[test]
fn demos_load_and_validate() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/projects");
    let demos = ["npke_benchmarks.yaml"];

    for name in demos {
        let path = root.join(name);
        let project = pk_project::load_yaml(&path)
            .unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e));
        pk_project::validate_project(&project)
            .unwrap_or_else(|e| panic!("Failed to validate {}: {}", name, e));
        assert!(!project.scenarios.is_empty());
    }
}
