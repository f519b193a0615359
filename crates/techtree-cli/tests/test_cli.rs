//! End-to-end tests for the `techtree` commands.
//!
//! Each test builds a small game data directory in a temp dir, then runs
//! commands the way the binary does (parsed from argv, JSON output).

use std::fs;
use std::io::Write;
use std::path::Path;

use clap::Parser;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::Value;
use techtree_cli::cli::Cli;
use techtree_cli::commands;
use techtree_cli::config::Settings;
use techtree_cli::loader::GameData;
use tempfile::TempDir;

// ── Fixture ────────────────────────────────────────────────────────────

const TECHS: &str = r#"[
    {"dataName": "Materials", "researchCost": 100, "AI_techRole": "Industry", "techCategory": "Materials"},
    {"dataName": "Rocketry", "researchCost": 150, "prereqs": ["Materials"], "AI_techRole": "Space", "techCategory": "SpaceScience",
     "effects": ["Effect_Orbit_CP", "Effect_Unnamed"], "resourcesGranted": [{"resource": "Boost", "value": 2}]},
    {"dataName": "Railguns", "researchCost": 300, "prereqs": ["Materials"], "AI_techRole": "Military", "techCategory": "MilitaryScience"}
]"#;

const PROJECTS: &str = r#"[
    {"dataName": "Project_Rail", "researchCost": 50, "prereqs": ["Railguns"], "AI_projectRole": "Military"}
]"#;

const GUNS: &str = r#"[
    {"dataName": "Rail1", "friendlyName": "Railgun x1", "requiredProjectName": "Project_Rail", "mass_tons": 10},
    {"dataName": "Rail2", "friendlyName": "Railgun x2", "requiredProjectName": "Project_Rail", "mass_tons": 20}
]"#;

const ORGS: &str = r#"[
    {"dataName": "SpaceAgency", "requiredTechName": "Rocketry", "science": 2}
]"#;

struct Fixture {
    dir: TempDir,
    settings: Settings,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("game-data");
        let settings = Settings {
            game_data: root,
            state_dir: dir.path().join("state"),
            json: true,
        };

        write(&settings.template_path("TITechTemplate"), TECHS);
        write(&settings.template_path("TIProjectTemplate"), PROJECTS);
        write(&settings.template_path("TIGunTemplate"), GUNS);
        write(&settings.template_path("TIOrgTemplate"), ORGS);
        write(
            &settings.localization_path("TITechTemplate"),
            "TITechTemplate.displayName.Materials=Materials Science\n\
             TITechTemplate.displayName.Railguns=Railguns\n",
        );
        write(
            &settings.localization_path("TIProjectTemplate"),
            "TIProjectTemplate.displayName.Rail=Rail Mounts\n",
        );
        write(
            &settings.localization_path("TIGunTemplate"),
            "TIGunTemplate.displayName.Rail1=Magnetic Railgun x1\n\
             TIGunTemplate.displayName.Rail2=Magnetic Railgun x2\n",
        );
        write(
            &settings.localization_path("TIOrgTemplate"),
            "TIOrgTemplate.displayName.SpaceAgency=Space Agency\n",
        );
        write(
            &settings.localization_path("TIEffectTemplate"),
            "TIEffectTemplate.description.Effect_Orbit_CP=Increases control point management capacity by 2\n\
             TIEffectTemplate.displayName.Effect_Orbit_CP=Orbital Command\n",
        );
        write(&settings.benefits_path(), r#"{"Rocketry": "Reach orbit"}"#);

        Self { dir, settings }
    }

    /// Run one command line and parse its JSON output.
    fn run(&self, args: &[&str]) -> anyhow::Result<Value> {
        let cli = Cli::try_parse_from(std::iter::once("techtree").chain(args.iter().copied()))?;
        let mut out = Vec::new();
        commands::run(cli.command, &self.settings, &mut out)?;
        Ok(serde_json::from_slice(&out)?)
    }

    fn ok(&self, args: &[&str]) -> Value {
        self.run(args)
            .unwrap_or_else(|e| panic!("techtree {}: {:#}", args.join(" "), e))
    }

    fn ids(&self, args: &[&str]) -> Vec<String> {
        self.ok(args)
            .as_array()
            .unwrap()
            .iter()
            .map(|row| row["id"].as_str().unwrap().to_string())
            .collect()
    }
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn save_json(techs: &[&str], projects: &[&str]) -> String {
    serde_json::json!({
        "gamestates": {
            "PavonisInteractive.TerraInvicta.TIPlayerState": [
                {"Key": {"value": 5}, "Value": {"isAI": false}}
            ],
            "PavonisInteractive.TerraInvicta.TIGlobalResearchState": [
                {"Key": {"value": 1}, "Value": {"finishedTechsNames": techs}}
            ],
            "PavonisInteractive.TerraInvicta.TIFactionState": [
                {"Key": {"value": 9}, "Value": {"player": {"value": 5}, "finishedProjectNames": projects}}
            ]
        }
    })
    .to_string()
}

// ── Loading ────────────────────────────────────────────────────────────

#[test]
fn load_reads_templates_localization_and_tables() {
    let fx = Fixture::new();
    let data = GameData::load(&fx.settings).unwrap();

    assert_eq!(data.tree.len(), 4);
    assert_eq!(data.tree.get("Project_Rail").unwrap().name(), "Rail Mounts");
    assert_eq!(data.modules.len(), 2);
    assert_eq!(data.modules.get("Rail1").unwrap().name(), Some("Magnetic Railgun x1"));
    assert_eq!(data.orgs.get("SpaceAgency").unwrap().name(), Some("Space Agency"));
    assert_eq!(data.effects.len(), 1);
    assert_eq!(data.benefits.get("Rocketry").unwrap(), "Reach orbit");
}

#[test]
fn missing_project_template_is_fatal() {
    let fx = Fixture::new();
    fs::remove_file(fx.settings.template_path("TIProjectTemplate")).unwrap();
    let err = GameData::load(&fx.settings).unwrap_err();
    assert!(format!("{err:#}").contains("TIProjectTemplate.json"));
}

#[test]
fn auxiliary_data_is_optional() {
    let fx = Fixture::new();
    fs::remove_dir_all(fx.settings.game_data.join("Localization")).unwrap();
    fs::remove_file(fx.settings.template_path("TIOrgTemplate")).unwrap();
    fs::remove_file(fx.settings.benefits_path()).unwrap();
    write(&fx.settings.template_path("TIGunTemplate"), "[{");

    let data = GameData::load(&fx.settings).unwrap();
    assert_eq!(data.tree.len(), 4);
    assert_eq!(data.tree.get("Materials").unwrap().name(), "Materials");
    assert!(data.modules.is_empty());
    assert!(data.orgs.is_empty());
    assert!(data.effects.is_empty());
    assert!(data.benefits.is_empty());
}

#[test]
fn validate_reports_counts() {
    let fx = Fixture::new();
    let summary = fx.ok(&["validate"]);
    assert_eq!(summary["technologies"], 3);
    assert_eq!(summary["projects"], 1);
    assert_eq!(summary["modules"], 2);
    assert_eq!(summary["effects"], 1);
    assert_eq!(summary["max_level"], 3);
}

// ── Browsing ───────────────────────────────────────────────────────────

#[test]
fn roles_and_role_listing() {
    let fx = Fixture::new();
    assert_eq!(
        fx.ok(&["roles"]),
        serde_json::json!(["Industry", "Military", "Space"])
    );
    assert_eq!(fx.ok(&["roles", "--search", "rail"]), serde_json::json!(["Military"]));
    assert_eq!(fx.ids(&["role", "Military"]), vec!["Railguns", "Project_Rail"]);
}

#[test]
fn show_project_collapses_module_variants() {
    let fx = Fixture::new();
    let detail = fx.ok(&["show", "Project_Rail"]);
    assert_eq!(detail["kind"], "project");
    assert_eq!(detail["missing_science"], 450.0);
    let modules = detail["modules"].as_array().unwrap();
    assert_eq!(modules.len(), 1);
    assert_eq!(modules[0]["name"], "Magnetic Railgun");
    assert_eq!(modules[0]["stats"][0]["label"], "Mass tons");
}

#[test]
fn show_tech_lists_orgs_and_benefits() {
    let fx = Fixture::new();
    let detail = fx.ok(&["show", "Rocketry"]);
    assert_eq!(detail["status"], "locked");
    assert_eq!(detail["orgs"][0]["name"], "Space Agency");
    assert_eq!(detail["orgs"][0]["yields"][0]["value"], "+2");
    assert_eq!(detail["benefits"], "Reach orbit");
    assert!(fx.run(&["show", "Ghost"]).is_err());
}

#[test]
fn show_tech_lists_effects_resources_and_cp_stats() {
    let fx = Fixture::new();
    let detail = fx.ok(&["show", "Rocketry"]);
    assert_eq!(
        detail["effects"],
        serde_json::json!([
            {"id": "Effect_Orbit_CP", "description": "Increases control point management capacity by 2"},
            {"id": "Effect_Unnamed", "description": null}
        ])
    );
    assert_eq!(
        detail["resources_granted"],
        serde_json::json!([{"resource": "Boost", "value": 2.0}])
    );
    assert_eq!(
        detail["cp_stats"],
        serde_json::json!({"cp": 2.0, "total_cost": 250.0, "standalone_cost": 150.0})
    );

    // Known requirements do not lower the total cost.
    fx.ok(&["known", "toggle", "Materials"]);
    assert_eq!(fx.ok(&["show", "Rocketry"])["cp_stats"]["total_cost"], 250.0);
    assert!(fx.ok(&["show", "Materials"])["cp_stats"].is_null());
}

#[test]
fn text_output_shows_effects_and_cp() {
    let mut fx = Fixture::new();
    fx.settings.json = false;
    let cli = Cli::try_parse_from(["techtree", "show", "Rocketry"]).unwrap();
    let mut out = Vec::new();
    commands::run(cli.command, &fx.settings, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("  effect: Increases control point management capacity by 2\n"));
    assert!(text.contains("  effect: Effect_Unnamed\n"));
    assert!(text.contains("  grants: 2 Boost\n"));
    assert!(text.contains("  control points: +2 (125 science per CP in total, 75 on its own)\n"));
}

#[test]
fn text_output() {
    let mut fx = Fixture::new();
    fx.settings.json = false;
    let cli = Cli::try_parse_from(["techtree", "search", "materials"]).unwrap();
    let mut out = Vec::new();
    commands::run(cli.command, &fx.settings, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("available"));
    assert!(text.contains("Materials Science (Materials)"));
}

// ── Known state ────────────────────────────────────────────────────────

#[test]
fn toggle_persists_between_runs() {
    let fx = Fixture::new();
    let change = fx.ok(&["known", "toggle", "Rocketry"]);
    assert_eq!(change["newly_known"], 2);

    let saved = fs::read_to_string(fx.settings.known_path()).unwrap();
    assert_eq!(saved, r#"["Materials","Rocketry"]"#);

    assert_eq!(fx.ids(&["known", "list"]), vec!["Materials", "Rocketry"]);
    assert_eq!(fx.ok(&["show", "Railguns"])["status"], "available");

    fx.ok(&["known", "clear"]);
    assert!(fx.ids(&["known", "list"]).is_empty());
}

#[test]
fn toggle_off_under_known_dependent_survives_next_run() {
    let fx = Fixture::new();
    fx.ok(&["known", "toggle", "Rocketry"]);
    let change = fx.ok(&["known", "toggle", "Materials"]);
    assert_eq!(change["known"], 1);

    let saved = fs::read_to_string(fx.settings.known_path()).unwrap();
    assert_eq!(saved, r#"["Rocketry"]"#);
    assert_eq!(fx.ok(&["show", "Materials"])["status"], "available");
    assert_eq!(fx.ok(&["show", "Rocketry"])["status"], "known");
    assert_eq!(fx.ids(&["known", "list"]), vec!["Rocketry"]);
}

#[test]
fn import_compressed_save() {
    let fx = Fixture::new();
    let path = fx.dir.path().join("Autosave.gz");
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(save_json(&["Railguns"], &["Project_Rail"]).as_bytes())
        .unwrap();
    fs::write(&path, encoder.finish().unwrap()).unwrap();

    let change = fx.ok(&["known", "import", path.to_str().unwrap()]);
    assert_eq!(change["changed"], serde_json::json!(["Railguns", "Project_Rail"]));
    assert_eq!(change["newly_known"], 3);
    assert_eq!(fx.ok(&["show", "Rocketry"])["status"], "available");
}

#[test]
fn import_with_unknown_id_changes_nothing() {
    let fx = Fixture::new();
    let path = fx.dir.path().join("save.json");
    fs::write(&path, save_json(&["Materials", "Ghost"], &[])).unwrap();

    assert!(fx.run(&["known", "import", path.to_str().unwrap()]).is_err());
    assert!(!fx.settings.known_path().exists());
}

// ── Pinned goals ───────────────────────────────────────────────────────

#[test]
fn pin_move_unpin() {
    let fx = Fixture::new();
    fx.ok(&["pin", "Rocketry"]);
    fx.ok(&["pin", "Railguns"]);
    assert_eq!(
        fx.ok(&["pin", "Project_Rail"]),
        serde_json::json!(["Rocketry", "Railguns", "Project_Rail"])
    );
    assert_eq!(
        fx.ok(&["move", "Project_Rail", "0"]),
        serde_json::json!(["Project_Rail", "Rocketry", "Railguns"])
    );
    assert_eq!(
        fx.ok(&["unpin", "Rocketry"]),
        serde_json::json!(["Project_Rail", "Railguns"])
    );

    assert!(fx.run(&["pin", "Ghost"]).is_err());
    assert!(fx.run(&["unpin", "Rocketry"]).is_err());
    let saved = fs::read_to_string(fx.settings.pinned_path()).unwrap();
    assert_eq!(saved, r#"["Project_Rail","Railguns"]"#);
}

#[test]
fn unpin_all_clears_saved_list() {
    let fx = Fixture::new();
    fx.ok(&["pin", "Rocketry"]);
    fx.ok(&["pin", "Project_Rail"]);
    assert_eq!(fx.ok(&["unpin", "--all"]), serde_json::json!([]));

    let saved = fs::read_to_string(fx.settings.pinned_path()).unwrap();
    assert_eq!(saved, "[]");
    assert_eq!(fx.ok(&["pinned"])["goals"], serde_json::json!([]));
    // Clearing an empty list is fine.
    assert_eq!(fx.ok(&["unpin", "--all"]), serde_json::json!([]));
}

#[test]
fn pinned_summary_modes() {
    let fx = Fixture::new();
    fx.ok(&["pin", "Project_Rail"]);
    fx.ok(&["pin", "Rocketry"]);

    let report = fx.ok(&["pinned", "--mode", "recursive"]);
    assert_eq!(report["mode"], "recursive");
    assert_eq!(report["goals"][0]["id"], "Rocketry");
    assert_eq!(report["total_missing_science"], 600.0);
    assert_eq!(report["summary_cost"], 600.0);
    assert_eq!(report["categories"][0]["name"], "Military Science");
    assert_eq!(report["categories"][3]["name"], "Other");

    let direct = fx.ok(&["pinned"]);
    assert_eq!(direct["summary_cost"], 200.0);
    assert_eq!(direct["total_missing_science"], 600.0);
}
