// ABOUTME: What happens to created resources after a late failure.
// ABOUTME: Keep reports them; compensate removes them newest first.

use tracing::{info, warn};

use crate::config::CleanupPolicy;
use crate::diagnostics::{Diagnostics, Warning};
use crate::dns::DnsRegistrar;
use crate::provision::ContainerProvisioner;
use crate::proxy::ProxyConfigurator;

use super::outcome::{CompensationAction, CompensationRecord, Resources};

/// Apply `policy` to `resources`. Never fails; every problem ends up in the
/// returned records or in `diag`.
pub async fn settle(
    resources: &Resources,
    policy: CleanupPolicy,
    provisioner: &dyn ContainerProvisioner,
    registrar: &dyn DnsRegistrar,
    proxy: &dyn ProxyConfigurator,
    diag: &mut Diagnostics,
) -> Vec<CompensationRecord> {
    if !policy.compensates() {
        report_leftovers(resources, diag);
        return Vec::new();
    }

    let mut records = Vec::new();

    if let Some(name) = &resources.proxy_files {
        let result = proxy.remove(name).await.map_err(|e| e.to_string());
        records.push(record(
            CompensationAction::RemoveProxyFiles,
            name.to_string(),
            result,
            diag,
        ));
    }

    if let Some(dns) = &resources.dns_record {
        let result = registrar.deregister(dns).await.map_err(|e| e.to_string());
        records.push(record(
            CompensationAction::DeleteDnsRecord,
            dns.id.to_string(),
            result,
            diag,
        ));
    }

    if let Some(id) = &resources.container {
        let result = provisioner.remove(id).await.map_err(|e| e.to_string());
        records.push(record(
            CompensationAction::RemoveContainer,
            id.to_string(),
            result,
            diag,
        ));
    }

    records
}

fn record(
    action: CompensationAction,
    target: String,
    result: Result<(), String>,
    diag: &mut Diagnostics,
) -> CompensationRecord {
    match result {
        Ok(()) => {
            info!(?action, %target, "compensated");
            CompensationRecord {
                action,
                target,
                succeeded: true,
                error: None,
            }
        }
        Err(error) => {
            warn!(?action, %target, %error, "compensation failed");
            diag.warn(Warning::compensation_failed(format!(
                "{:?} for {} failed: {}",
                action, target, error
            )));
            CompensationRecord {
                action,
                target,
                succeeded: false,
                error: Some(error),
            }
        }
    }
}

fn report_leftovers(resources: &Resources, diag: &mut Diagnostics) {
    if let Some(name) = &resources.proxy_files {
        diag.warn(Warning::proxy_files_left(format!(
            "proxy files {} left in place",
            name.config_file_name()
        )));
    }
    if let Some(dns) = &resources.dns_record {
        diag.warn(Warning::dns_record_left(format!(
            "DNS record {} ({}) left in place",
            dns.name, dns.id
        )));
    }
    if let Some(id) = &resources.container {
        diag.warn(Warning::container_left(format!(
            "container {} left in place",
            id.short()
        )));
    }
}
