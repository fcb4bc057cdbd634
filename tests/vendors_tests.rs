use lan_sweep_rs::types::HwAddr;
use lan_sweep_rs::vendors::{VendorDb, UNKNOWN_VENDOR};

const TABLE: &str = "\
# vendor prefixes
AABBCC ExampleCorp
001B63 Apple, Inc.
";

#[test]
fn hit_and_miss() {
    let db = VendorDb::parse_str(TABLE);
    assert_eq!(db.lookup(&HwAddr::from_token("00:1b:63:aa:bb:cc")), "Apple, Inc.");
    assert_eq!(db.lookup(&HwAddr::from_token("ff:ff:ff:aa:bb:cc")), UNKNOWN_VENDOR);
}

#[test]
fn separator_style_does_not_affect_lookup() {
    let db = VendorDb::parse_str(TABLE);
    let colons = HwAddr::from_token("aa:bb:cc:11:22:33");
    let hyphens = HwAddr::from_token("AA-BB-CC-44-55-66");
    assert_eq!(db.lookup(&colons), "ExampleCorp");
    assert_eq!(db.lookup(&hyphens), "ExampleCorp");
}

#[test]
fn sentinels_never_reach_the_table() {
    let db = VendorDb::parse_str(TABLE);
    assert_eq!(db.lookup(&HwAddr::NotFound), UNKNOWN_VENDOR);
    assert_eq!(db.lookup(&HwAddr::Error), UNKNOWN_VENDOR);
}

#[test]
fn load_from_missing_path_errors() {
    let err = VendorDb::load_from_path("/nonexistent/oui.txt");
    assert!(err.is_err());
}
