//! Schema migration framework.

use crate::ProjectError;
use crate::schema::Project;

pub const LATEST_VERSION: u32 = 1;

pub fn migrate_to_latest(mut project: Project) -> Result<Project, ProjectError> {
    while project.version < LATEST_VERSION {
        project = migrate_one_version(project)?;
    }
    Ok(project)
}

fn migrate_one_version(project: Project) -> Result<Project, ProjectError> {
    match project.version {
        0 => migrate_v0_to_v1(project),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// Version 0 files always summed with the legacy 8-decimal rounding.
fn migrate_v0_to_v1(mut project: Project) -> Result<Project, ProjectError> {
    if project.solver.sum_rounding_decimals.is_none() {
        project.solver.sum_rounding_decimals = Some(crate::schema::LEGACY_ROUNDING_DECIMALS);
    }
    project.version = 1;
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SolverDef;

    fn empty(version: u32) -> Project {
        Project {
            version,
            name: "test".to_string(),
            solver: SolverDef::default(),
            cores: vec![],
            scenarios: vec![],
        }
    }

    #[test]
    fn migrate_latest_is_noop() {
        let project = empty(LATEST_VERSION);
        let migrated = migrate_to_latest(project.clone()).unwrap();
        assert_eq!(migrated, project);
    }

    #[test]
    fn version_zero_keeps_legacy_rounding() {
        let migrated = migrate_to_latest(empty(0)).unwrap();
        assert_eq!(migrated.version, 1);
        assert_eq!(migrated.solver.sum_rounding_decimals, Some(8));
    }

    #[test]
    fn version_zero_respects_explicit_rounding() {
        let mut project = empty(0);
        project.solver.sum_rounding_decimals = Some(12);
        let migrated = migrate_to_latest(project).unwrap();
        assert_eq!(migrated.solver.sum_rounding_decimals, Some(12));
    }
}
