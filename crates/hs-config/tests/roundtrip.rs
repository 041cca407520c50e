use hs_config::*;

fn atmosphere() -> RunFile {
    RunFile {
        version: LATEST_VERSION,
        name: "roundtrip".to_string(),
        grid: GridDef {
            zones: 64,
            xmin: 0.0,
            xmax: 2000.0,
            max_zones: 64,
            geometry: GeometryDef::Planar,
        },
        eos: EosDef {
            coulomb_corrections: true,
        },
        gravity: GravityDef::PointMass { mass_solar: 1.2 },
        floors: FloorsDef {
            fluff_temperature: FluffTemperatureDef::Continuous,
            ..FloorsDef::default()
        },
        solver: SolverDef {
            convergence: ConvergenceDef::Residual,
            retry: Some(RetryDef {
                max_retries: 5,
                relax_factor: 1.5,
            }),
            ..SolverDef::default()
        },
        mass_match: MassMatchDef::default(),
        model: ModelDef::Atmosphere {
            star: CompositionDef::from([("C12".to_string(), 0.5), ("O16".to_string(), 0.5)]),
            fuel: CompositionDef::from([("He4".to_string(), 1.0)]),
            star_temperature: 1e8,
            base_temperature: 5e8,
            base_density: 2e6,
            layer_height: 500.0,
            width: 62.5,
            base_rule: BaseRuleDef::Temperature,
        },
    }
}

#[test]
fn roundtrip_yaml() {
    let run = atmosphere();
    let path = std::env::temp_dir().join("hs_config_roundtrip.yaml");
    save_yaml(&path, &run).unwrap();
    assert_eq!(load_yaml(&path).unwrap(), run);
}

#[test]
fn roundtrip_json() {
    let run = atmosphere();
    let path = std::env::temp_dir().join("hs_config_roundtrip.json");
    save_json(&path, &run).unwrap();
    assert_eq!(load(&path).unwrap(), run);
}

#[test]
fn invalid_run_is_not_saved() {
    let mut run = atmosphere();
    run.grid.zones = 65;
    let path = std::env::temp_dir().join("hs_config_invalid.yaml");
    assert!(matches!(
        save_yaml(&path, &run),
        Err(ConfigError::Validation(_))
    ));
}

#[test]
fn unknown_model_type_is_a_parse_error() {
    let text = r#"
version: 1
name: bad
grid: { zones: 8, xmax: 1.0 }
gravity: { type: enclosed_mass }
model: { type: neutron_star }
"#;
    assert!(matches!(from_yaml_str(text), Err(ConfigError::Yaml(_))));
}
