use std::thread;
use std::time::Duration;

use linebot::config::{ACQUISITION_TIMEOUT_US, SENSOR_COUNT};
use linebot::sensors::SensorBank;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║     Line Sensor Tuning Tool                          ║");
    println!("╚══════════════════════════════════════════════════════╝\n");

    println!("Instructions:");
    println!("1. Put the robot down with the sensors over the track surface");
    println!("2. Slowly slide it sideways across the line and back");
    println!("3. Every sensor should pass over both surfaces");
    println!("4. Read the suggested threshold off the last column");
    println!("5. Press Ctrl+C when done\n");

    println!("Starting in 3 seconds...\n");
    thread::sleep(Duration::from_secs(3));

    let mut sensors = SensorBank::new(Some(ACQUISITION_TIMEOUT_US))?;

    let mut fastest = [u32::MAX; SENSOR_COUNT];
    let mut slowest = [0u32; SENSOR_COUNT];
    let mut sample_count = 0u32;

    println!(
        "{:^8} | {:^41} | {:^10} | {:^9}",
        "Sample", "Discharge times (us), left to right", "Spread", "Threshold"
    );
    println!("{:-<8}-+-{:-<41}-+-{:-<10}-+-{:-<9}", "", "", "", "");

    loop {
        let reading = sensors.acquire();
        for (i, &time) in reading.times_us().iter().enumerate() {
            // timed out lines carry no information about the surface
            if reading.is_timed_out(i) {
                continue;
            }
            fastest[i] = fastest[i].min(time);
            slowest[i] = slowest[i].max(time);
        }
        sample_count += 1;

        // Print update every 10 samples
        if sample_count % 10 == 0 {
            let times: Vec<String> = reading
                .times_us()
                .iter()
                .map(|t| format!("{t:>5}"))
                .collect();

            let (spread, threshold) = summary_columns(&fastest, &slowest);
            println!(
                "{:^8} | {:<41} | {:>10} | {:>9}",
                sample_count,
                times.join(" "),
                spread,
                threshold
            );
        }

        thread::sleep(Duration::from_millis(50));
    }
}

/// Spread and suggested threshold columns. Shows `-` until at least one
/// line has produced a real measurement.
fn summary_columns(fastest: &[u32], slowest: &[u32]) -> (String, String) {
    let min = fastest.iter().copied().min().unwrap_or(u32::MAX);
    let max = slowest.iter().copied().max().unwrap_or(0);
    if min == u32::MAX {
        return ("-".to_string(), "-".to_string());
    }

    let spread = format!("{}-{}", min, max);
    let threshold = if max > min {
        min.midpoint(max).to_string()
    } else {
        "-".to_string()
    };
    (spread, threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_measurement_yet() {
        let (spread, threshold) = summary_columns(&[u32::MAX; SENSOR_COUNT], &[0; SENSOR_COUNT]);
        assert_eq!(spread, "-");
        assert_eq!(threshold, "-");
    }

    #[test]
    fn test_summary_of_both_surfaces() {
        let fastest = [130, 95, u32::MAX, 100, 120, 110];
        let slowest = [900, 920, 0, 895, 910, 905];
        let (spread, threshold) = summary_columns(&fastest, &slowest);
        assert_eq!(spread, "95-920");
        assert_eq!(threshold, "507");
    }

    #[test]
    fn test_single_surface_has_no_threshold() {
        let (spread, threshold) = summary_columns(&[400; SENSOR_COUNT], &[400; SENSOR_COUNT]);
        assert_eq!(spread, "400-400");
        assert_eq!(threshold, "-");
    }
}
