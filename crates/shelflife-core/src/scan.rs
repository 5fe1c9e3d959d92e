// Barcode scan simulator - there is no camera, just a delay and a dice roll
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;
use tracing::debug;

use crate::seed::{ScannedItem, SCAN_FIXTURE};

/// How long a "scan" takes
pub const SCAN_DELAY: Duration = Duration::from_millis(1500);

/// Pick one item from the scan fixture
pub fn pick_scanned_item<R: Rng + ?Sized>(rng: &mut R) -> ScannedItem {
    SCAN_FIXTURE
        .choose(rng)
        .copied()
        .unwrap_or(SCAN_FIXTURE[0])
}

/// Wait `delay`, then pretend a barcode was recognised.
///
/// Nothing cancels the wait; a caller that no longer cares just drops the
/// result (or the future).
pub async fn simulate_scan_after(delay: Duration) -> ScannedItem {
    debug!("Scanning for {:?}", delay);
    tokio::time::sleep(delay).await;

    let item = pick_scanned_item(&mut rand::thread_rng());
    debug!("Scan recognised {}", item.name);
    item
}

pub async fn simulate_scan() -> ScannedItem {
    simulate_scan_after(SCAN_DELAY).await
}
