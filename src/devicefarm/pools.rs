//! Device pool listing
//!
//! Paginated scans over `ListDevicePools`.

use super::api::{DeviceFarmApi, DevicePoolSummary, DevicePoolType, ListDevicePoolsParams};
use anyhow::Result;

/// Name of the curated pool Device Farm creates for every project
pub const TOP_DEVICES_POOL_NAME: &str = "Top Devices";

/// Walk every page of device pools of `pool_type` in `project_arn`, stopping
/// at the first pool for which `visit` returns `Some`.
pub async fn scan_device_pools<C, F, T>(
    client: &C,
    project_arn: &str,
    pool_type: DevicePoolType,
    mut visit: F,
) -> Result<Option<T>>
where
    C: DeviceFarmApi + ?Sized,
    F: FnMut(&DevicePoolSummary) -> Option<T>,
{
    let mut next_token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let params = ListDevicePoolsParams {
            arn: project_arn.to_string(),
            pool_type,
            next_token: next_token.take(),
        };
        let page = client.list_device_pools(&params).await?;
        pages += 1;

        // Pools that report a different type are skipped; a missing type is trusted
        let found = page
            .device_pools
            .iter()
            .filter(|pool| pool.pool_type.map_or(true, |t| t == pool_type))
            .find_map(&mut visit);
        if let Some(found) = found {
            return Ok(Some(found));
        }

        match page.next_token {
            Some(token) if !token.is_empty() => next_token = Some(token),
            _ => break,
        }
    }

    tracing::debug!("Scanned {} page(s) of device pools for {}", pages, project_arn);
    Ok(None)
}

/// Find the ARN of the first curated pool named exactly `name`
pub async fn find_curated_pool_arn<C>(
    client: &C,
    project_arn: &str,
    name: &str,
) -> Result<Option<String>>
where
    C: DeviceFarmApi + ?Sized,
{
    scan_device_pools(client, project_arn, DevicePoolType::Curated, |pool| {
        (pool.name == name).then(|| pool.arn.clone())
    })
    .await
}

/// Find the "Top Devices" pool of a project
pub async fn find_top_devices_pool_arn<C>(client: &C, project_arn: &str) -> Result<Option<String>>
where
    C: DeviceFarmApi + ?Sized,
{
    let arn = find_curated_pool_arn(client, project_arn, TOP_DEVICES_POOL_NAME).await?;
    if arn.is_none() {
        tracing::warn!("{} device pool not found for {}", TOP_DEVICES_POOL_NAME, project_arn);
    }
    Ok(arn)
}
