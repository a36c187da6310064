//! End-to-end tests for the `undercloud install` and `undercloud upgrade`
//! commands. Only `--dry-run` is exercised; nothing is executed.

#[allow(dead_code)]
mod common;
use common::prelude::*;

#[test]
fn test_install_legacy_dry_run() {
    let fixture = TestFixture::new();
    fixture
        .command()
        .args(["--color", "never", "install", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::diff("[DRY-RUN] instack-install-undercloud\n"));
}

#[test]
fn test_upgrade_legacy_dry_run_lists_scripts_in_order() {
    let fixture = TestFixture::new();
    let expected = "[DRY-RUN] sudo yum update -y instack-undercloud\n\
                    [DRY-RUN] instack-pre-upgrade-undercloud\n\
                    [DRY-RUN] instack-upgrade-undercloud\n\
                    [DRY-RUN] sudo systemctl restart openstack-nova-api\n";
    fixture
        .command()
        .args(["--color", "never", "upgrade", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::diff(expected));
}

#[test]
fn test_install_with_heat_uses_config_file() {
    let fixture = TestFixture::new().with_file(
        "home/undercloud.conf",
        "[DEFAULT]\n\
         container_images_file = /home/stack/foo.yaml\n\
         overcloud_domain_name = example.com\n\
         templates = /opt/tht\n",
    );
    let output_dir = fixture.home().display().to_string();
    fixture
        .command()
        .args(["install", "--use-heat", "--no-validations", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "sudo openstack undercloud deploy --local-domain=example.com \
             --local-ip=192.168.24.1/24 --templates=/opt/tht --heat-native \
             -e /home/stack/foo.yaml -e /opt/tht/environments/services-docker/ironic.yaml",
        ))
        .stdout(predicate::str::contains(
            "--public-virtual-ip 192.168.24.2 --control-virtual-ip 192.168.24.3",
        ))
        .stdout(predicate::str::contains(format!(
            "-e /opt/tht/environments/undercloud.yaml -e {}/undercloud-parameters.yaml \
             --output-dir={} --debug",
            output_dir, output_dir
        )));
    // A dry run only prints; the parameters file is written before a real run.
    assert!(!fixture.home().join("undercloud-parameters.yaml").exists());
}

#[test]
fn test_upgrade_with_heat_adds_upgrade_environment() {
    let fixture = TestFixture::new();
    fixture
        .command()
        .args(["upgrade", "--use-heat", "--no-validations", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "--templates=/usr/share/openstack-tripleo-heat-templates/ -e \
             /usr/share/openstack-tripleo-heat-templates/environments/major-upgrade-composable-steps-docker.yaml \
             --heat-native",
        ));
}

#[test]
fn test_install_explicit_config_via_env() {
    let fixture = TestFixture::new().with_file("custom.conf", "[DEFAULT]\nenable_ui = nope\n");
    fixture
        .command()
        .env("UNDERCLOUD_CONF", fixture.path().join("custom.conf"))
        .args(["install", "--use-heat", "--dry-run"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("enable_ui must be a boolean"));
}
