//! Role → stage title table
//!
//! Titles must match what the frontend header regex and the backend
//! stage detector look for, character for character.

use indexmap::IndexMap;
use once_cell::sync::Lazy;

/// Border line of a stage header block
pub const BORDER: &str = "════════════════════════════════════════════════════════════════";

static STAGE_MAP: Lazy<IndexMap<&'static str, &'static str>> = Lazy::new(|| {
    IndexMap::from([
        ("check_requirements", "Checking System Requirements"),
        ("k3s", "Installing K3s"),
        ("helm", "Installing Helm"),
        ("istio", "Installing Istio"),
        ("certbot", "Installing Certbot"),
        ("letsencrypt_cert", "Generating Let's Encrypt SSL Certificate"),
        ("certificate_renewal", "Setting up Automatic Certificate Renewal"),
        ("mariadb", "Installing MariaDB"),
        ("mongodb", "Installing MongoDB"),
        ("rabbitmq", "Installing RabbitMQ"),
        ("nfs", "Setting up NFS Storage"),
        ("k8s_namespace", "Setting up Kubernetes Namespace"),
        ("ecr_credentials", "Setting up AWS ECR Credentials"),
        ("tls_secret", "Setting up TLS Secret"),
        ("deploy_stackbill", "Deploying StackBill from ECR"),
        ("istio_gateway", "Setting up Istio Gateway"),
        ("wait_for_pods", "Waiting for StackBill Pods"),
        ("podman", "Installing Podman"),
        ("cloudstack_simulator", "Deploying CloudStack Simulator"),
        ("cloudstack_rabbitmq", "Configuring CloudStack RabbitMQ"),
        ("cloudstack_user", "Creating CloudStack Admin User for StackBill"),
        ("save_credentials", "Saving Credentials"),
    ])
});

/// Look up the stage title for a role
pub fn stage_title(role: &str) -> Option<&'static str> {
    STAGE_MAP.get(role).copied()
}

/// All stages in deployment order
pub fn stages() -> impl Iterator<Item = (&'static str, &'static str)> {
    STAGE_MAP.iter().map(|(role, title)| (*role, *title))
}

/// The three lines of a stage header block
pub fn header_lines(title: &str) -> [String; 3] {
    [BORDER.to_string(), format!("║  {}  ║", title), BORDER.to_string()]
}
