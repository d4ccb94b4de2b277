use std::fs;

use gridbt_data::{load_catalog, prepare_universes, LoadPolicy};

#[test]
fn membership_join_selects_matching_rows() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let master = dir.path().join("master.csv");
    fs::write(
        &master,
        "date,symbol,open,high,low,close,volume\n\
         2021-01-04,ACME,10,11,9,10.5,100\n\
         2021-01-04,GLOBEX,20,21,19,20.5,200\n\
         2021-01-05,ACME,10.5,12,10,11.5,150\n\
         2021-01-05,INITECH,5,6,4,5.5,50\n",
    )
    .expect("write master");

    let members = dir.path().join("memberships");
    fs::create_dir_all(&members).expect("mkdir");
    fs::write(
        members.join("bluechip.csv"),
        "date,symbol\n\
         2021-01-04,ACME\n\
         2021-01-04,GLOBEX\n\
         2021-01-05,ACME\n\
         2021-01-05,MISSING\n",
    )
    .expect("write membership");

    let out = dir.path().join("universes");
    let written = prepare_universes(&master, &members, &out).expect("prepare");
    assert_eq!(written, vec!["bluechip".to_string()]);

    let catalog = load_catalog(&out, LoadPolicy::Abort).expect("load back");
    let dataset = &catalog["bluechip"];
    // MISSING has no master rows, so only the three matched bars survive.
    assert_eq!(dataset.bars.len(), 3);
    assert!(dataset.bars.iter().all(|bar| bar.symbol != "MISSING"));
    // Rows come out sorted by (date, symbol).
    let symbols: Vec<&str> = dataset.bars.iter().map(|bar| bar.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["ACME", "GLOBEX", "ACME"]);
}
