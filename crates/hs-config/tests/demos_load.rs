use hs_config::{GravityDef, ModelDef, load};
use std::path::PathBuf;

fn demos_dir() -> PathBuf {
    let crate_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    crate_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .join("demos")
}

#[test]
fn demos_load_and_validate() {
    let demos = [
        "carbon_core.yaml",
        "helium_shell.yaml",
        "helium_atmosphere.yaml",
        "urca_core.json",
    ];

    for rel in demos {
        let path = demos_dir().join(rel);
        let result = load(&path);
        assert!(
            result.is_ok(),
            "demo failed validation: {} => {:?}",
            path.display(),
            result.err()
        );
    }
}

#[test]
fn defaults_fill_omitted_sections() {
    let run = load(&demos_dir().join("helium_shell.yaml")).unwrap();
    assert_eq!(run.grid.xmin, 0.0);
    assert_eq!(run.solver.tolerance, 1e-10);
    assert_eq!(run.solver.damping, 0.1);
    assert!(run.solver.retry.is_none());
    assert!(!run.eos.coulomb_corrections);
    match run.model {
        ModelDef::StellarCore { envelope, core, .. } => {
            let envelope = envelope.expect("envelope section");
            assert_eq!(envelope.composition.get("helium-4"), Some(&1.0));
            assert_eq!(core.len(), 2);
        }
        other => panic!("unexpected model {}", other.kind()),
    }
}

#[test]
fn tagged_sections_parse() {
    let run = load(&demos_dir().join("helium_atmosphere.yaml")).unwrap();
    assert_eq!(
        run.gravity,
        GravityDef::Constant {
            acceleration: -2.45e14
        }
    );
    assert_eq!(run.model.kind(), "atmosphere");

    let run = load(&demos_dir().join("urca_core.json")).unwrap();
    assert_eq!(run.model.kind(), "urca_core");
    assert_eq!(run.solver.retry.as_ref().map(|r| r.max_retries), Some(50));
}
