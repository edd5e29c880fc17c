use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::command::{ShellCommand, View, parse_shell_line, split_shell_words};
use super::*;
use crate::model::seed::seed_inventory;
use crate::model::{AntibodyField, StainType};
use crate::session::StockPolicy;

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let id = DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.push(format!("kira_abpanel_shell_{}_{}", std::process::id(), id));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn new_shell(out_dir: PathBuf) -> Shell {
    Shell::new(
        Session::new(seed_inventory(), StockPolicy::Allow),
        ShellConfig {
            out_dir,
            cell_count: 4.0,
        },
    )
}

fn run(shell: &mut Shell, script: &str) -> String {
    let mut out = Vec::new();
    run_script(shell, script.as_bytes(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_split_shell_words_quotes() {
    let words = split_shell_words(r#"name "Panel A" 'x y' a\ b"#).unwrap();
    assert_eq!(words, vec!["name", "Panel A", "x y", "a b"]);
    assert_eq!(split_shell_words(r#"name """#).unwrap(), vec!["name", ""]);
    assert!(split_shell_words("name \"open").is_err());
    assert!(split_shell_words("   ").is_err());
}

#[test]
fn test_parse_commands() {
    assert_eq!(parse_shell_line("toggle 3").unwrap(), ShellCommand::Toggle(3));
    assert_eq!(
        parse_shell_line("view saved").unwrap(),
        ShellCommand::View(View::SavedPanels)
    );
    assert_eq!(
        parse_shell_line("name Panel A").unwrap(),
        ShellCommand::Name("Panel A".to_string())
    );
    assert_eq!(parse_shell_line("load #2").unwrap(), ShellCommand::Load(2));
    assert_eq!(
        parse_shell_line("edit 1 stock_volume 12").unwrap(),
        ShellCommand::Edit {
            id: 1,
            field: AntibodyField::StockVolume,
            value: "12".to_string()
        }
    );
    assert_eq!(parse_shell_line("search").unwrap(), ShellCommand::Search(String::new()));
    assert!(parse_shell_line("toggle abc").is_err());
    assert!(parse_shell_line("view nowhere").is_err());
    assert!(parse_shell_line("frobnicate").is_err());
    assert!(parse_shell_line("save now").is_err());
}

#[test]
fn test_parse_add_with_and_without_id() {
    let ShellCommand::Add(new) = parse_shell_line("add CD19 HIB19 142Nd 0.5 1.0 200 20 ec").unwrap()
    else {
        panic!("expected add");
    };
    assert_eq!(new.id, None);
    assert_eq!(new.stain_type, StainType::Extracellular);

    let ShellCommand::Add(new) =
        parse_shell_line("add FoxP3 PCH101 162Dy 0.5 1.0 200 20 Intracellular 9").unwrap()
    else {
        panic!("expected add");
    };
    assert_eq!(new.id, Some(9));
    assert!(parse_shell_line("add CD19 HIB19 142Nd 0.5 1.0 200 20 surface").is_err());
    assert!(parse_shell_line("add CD19").is_err());
}

#[test]
fn test_login_gate() {
    let mut shell = new_shell(make_temp_dir());
    let out = run(&mut shell, "\n   \nalice\nwhoami\n");
    assert!(out.starts_with("Antibody Panel Manager\nEnter your name to continue\n"));
    assert_eq!(out.matches("Enter your name to continue").count(), 3);
    assert!(out.contains("Logged in as alice\n== Build Panel =="));
    assert_eq!(shell.session().user(), Some("alice"));
}

#[test]
fn test_build_and_execute_flow() {
    let mut shell = new_shell(make_temp_dir());
    let out = run(
        &mut shell,
        "alice\n\
         search cd8\n\
         toggle 3\n\
         name \"Panel A\"\n\
         cells 8\n\
         execute\n\
         history\n",
    );
    assert!(out.contains("[ ]   3  CD8 (146Nd)"));
    assert!(out.contains("Selected CD8 (146Nd)"));
    assert!(out.contains("CD8 (146Nd) -> 0.80 µL"));
    assert!(out.contains("Panel executed and stock updated"));
    assert!(out.contains("LOW   3  CD8 (146Nd)  stock 34.2 µL < alert 50.0 µL"));

    let session = shell.session();
    assert!(session.selection().is_empty());
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history()[0].panel_name, "Panel A");
    assert_eq!(shell.view(), View::History);
}

#[test]
fn test_execute_without_name_warns() {
    let mut shell = new_shell(make_temp_dir());
    let out = run(&mut shell, "alice\ntoggle 1\nexecute\nsave\n");
    assert_eq!(out.matches("Warning: panel name required").count(), 2);
    let session = shell.session();
    assert!(session.history().is_empty());
    assert!(session.saved_panels().is_empty());
    assert_eq!(session.antibody(1).unwrap().stock_volume, 500.0);
    assert_eq!(session.selection(), &[1]);
}

#[test]
fn test_cells_below_minimum_rejected() {
    let mut shell = new_shell(make_temp_dir());
    let out = run(&mut shell, "alice\ncells 0\ncells nope\n");
    assert!(out.contains("Warning: cell count must be at least 0.1"));
    assert!(out.contains("Error: invalid cell count 'nope'"));
}

#[test]
fn test_save_load_and_templates() {
    let mut shell = new_shell(make_temp_dir());
    let out = run(
        &mut shell,
        "alice\n\
         toggle 3\n\
         toggle 1\n\
         name Mixed\n\
         save\n\
         template-save\n\
         clear\n\
         delete 3\n\
         load 1\n\
         template-load 1\n\
         panels\n\
         templates\n",
    );
    assert!(out.contains("Panel saved as #1 Mixed"));
    assert!(out.contains("Template saved: Template 1"));
    assert!(out.contains("Loaded Mixed: 1 of 2 antibodies\nNot in inventory: 3"));
    assert!(out.contains("Loaded Template 1: 1 of 2 antibodies"));
    assert!(out.contains("#1 Mixed - created by alice"));
    assert!(out.contains("1. Template 1 (2 antibodies)"));
    assert_eq!(shell.session().selection(), &[1]);
}

#[test]
fn test_inventory_editing_commands() {
    let mut shell = new_shell(make_temp_dir());
    let out = run(
        &mut shell,
        "alice\n\
         add CD19 HIB19 142Nd 0.5 1.0 200 20 ec\n\
         edit 4 antigen CD20\n\
         edit 4 stockVolume -5\n\
         edit 4 colour red\n\
         delete 2\n\
         delete 2\n\
         inventory\n",
    );
    assert!(out.contains("Added #4 CD19 (142Nd)"));
    assert!(out.contains("Updated antigen of #4"));
    assert!(out.contains("Error: unknown inventory column: colour"));
    assert!(out.contains("Error: no antibody with id 2 in inventory"));
    let ab = shell.session().antibody(4).unwrap();
    assert_eq!(ab.antigen, "CD20");
    assert_eq!(ab.stock_volume, -5.0);
    assert!(shell.session().antibody(2).is_none());
}

#[test]
fn test_export_and_import_inventory() {
    let dir = make_temp_dir();
    let mut shell = new_shell(dir.clone());
    let out = run(&mut shell, "alice\nedit 1 stockVolume 12.5\nexport\nexport-history\n");
    assert!(out.contains("Exported 3 records to"));

    let csv = fs::read_to_string(dir.join("inventory.csv")).unwrap();
    assert!(csv.starts_with("id,antigen,clone,metal,concentration,volumePerTest,stockVolume"));
    assert!(csv.contains("1,CD3,UCHT1,170Er,0.5,2.0,12.5,50.0,Extracellular"));
    let history = fs::read_to_string(dir.join("history.json")).unwrap();
    assert_eq!(history.trim(), "[]");

    let mut fresh = new_shell(dir.clone());
    let import = format!("bob\nimport {}\n", dir.join("inventory.csv").display());
    let out = run(&mut fresh, &import);
    assert!(out.contains("Imported 3 records"));
    assert_eq!(fresh.session().antibody(1).unwrap().stock_volume, 12.5);
}

#[test]
fn test_quit_stops_script() {
    let mut shell = new_shell(make_temp_dir());
    run(&mut shell, "alice\nquit\ntoggle 1\n");
    assert!(shell.session().selection().is_empty());
}

#[test]
fn test_comment_lines_are_skipped() {
    let mut shell = new_shell(make_temp_dir());
    run(&mut shell, "# setup\nalice\n  # pick CD3\ntoggle 1\n");
    assert_eq!(shell.session().selection(), &[1]);
}

#[test]
fn test_replace_keeps_id_unless_given() {
    let mut shell = new_shell(make_temp_dir());
    let out = run(
        &mut shell,
        "alice\n\
         toggle 2\n\
         replace 2 CD4 SK3 145Nd 0.25 1.0 300 40 ic\n\
         replace 1 CD3 OKT3 170Er 0.5 2.0 100 10 ec 11\n\
         replace 99 X X X 1 1 1 1 ec\n",
    );
    assert!(out.contains("Selected CD4 (145Nd) (1 in panel)"));
    assert!(out.contains("Replaced #2 with #2 CD4 (145Nd)"));
    assert!(out.contains("Replaced #1 with #11 CD3 (170Er)"));
    assert!(out.contains("Error: no antibody with id 99 in inventory"));

    let session = shell.session();
    let cd4 = session.antibody(2).unwrap();
    assert_eq!(cd4.clone, "SK3");
    assert_eq!(cd4.stain_type, StainType::Intracellular);
    assert!(session.is_selected(2));
    assert!(session.antibody(1).is_none());
    assert_eq!(session.antibody(11).unwrap().clone, "OKT3");
}
