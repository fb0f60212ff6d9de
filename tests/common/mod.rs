use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use wiremock::MockServer;

use malipo::config::{Environment, OneKhusaConfig, PawaPayConfig, PayChanguConfig};
use malipo::providers::{OneKhusa, PawaPay, PayChangu};

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("malipo.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

#[allow(dead_code)]
pub fn paychangu(server: &MockServer) -> PayChangu {
    let config = PayChanguConfig {
        base_url: Some(server.uri()),
        ..PayChanguConfig::new("sk-test-secret")
    };
    PayChangu::new(&config).expect("paychangu client")
}

#[allow(dead_code)]
pub fn pawapay(server: &MockServer) -> PawaPay {
    let config = PawaPayConfig {
        base_url: Some(server.uri()),
        ..PawaPayConfig::new("pawapay-token")
    };
    PawaPay::new(&config, Environment::Sandbox).expect("pawapay client")
}

/// OneKhusa client whose API and token endpoint both live on `server`.
#[allow(dead_code)]
pub fn onekhusa(server: &MockServer) -> OneKhusa {
    let config = OneKhusaConfig {
        base_url: Some(server.uri()),
        ..OneKhusaConfig::new("client-id", "client-secret", "org-42")
    };
    OneKhusa::new(&config, Environment::Sandbox).expect("onekhusa client")
}
