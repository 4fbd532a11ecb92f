use super::*;

#[test]
fn test_init_replaces_instance() {
    assert!(!Configuration::instance().general.verbose);

    let mut config = Configuration::default();
    config.general.verbose = true;
    config.server.endpoint = "http://tasks.local".to_string();
    Configuration::init(config).expect("init failed");

    let instance = Configuration::instance();
    assert!(instance.general.verbose);
    assert_eq!(instance.server.endpoint, "http://tasks.local");
}

#[test]
fn test_user_agent() {
    assert_eq!(user_agent(), format!("taskwatch/{}", VERSION));
    assert!(version().starts_with("taskwatch version: "));
}
