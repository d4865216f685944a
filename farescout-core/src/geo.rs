//! Great-circle distance and flight time estimates.

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Average cruise speed used for duration estimates, km/h
const CRUISE_SPEED_KMH: f64 = 800.0;

/// Taxi, climb and descent overhead, minutes
const GROUND_OVERHEAD_MIN: f64 = 30.0;

/// Haversine distance between two coordinates, in kilometres
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // Clamp guards against a > 1 from float error on antipodal points
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Rough block time for a flight of `distance_km`, in minutes
pub fn estimate_flight_minutes(distance_km: f64) -> u32 {
    let minutes = distance_km.max(0.0) / CRUISE_SPEED_KMH * 60.0 + GROUND_OVERHEAD_MIN;
    minutes.round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CDG: (f64, f64) = (49.0097, 2.5479);
    const TBS: (f64, f64) = (41.6692, 44.9547);

    #[test]
    fn test_known_distance() {
        let d = distance_km(CDG.0, CDG.1, TBS.0, TBS.1);
        assert!((3300.0..3500.0).contains(&d), "CDG-TBS was {d}");
    }

    #[test]
    fn test_identity_is_zero() {
        assert_eq!(distance_km(CDG.0, CDG.1, CDG.0, CDG.1), 0.0);
    }

    #[test]
    fn test_duration_formula() {
        assert_eq!(estimate_flight_minutes(0.0), 30);
        assert_eq!(estimate_flight_minutes(800.0), 90);
        assert_eq!(estimate_flight_minutes(2000.0), 180);
    }

    proptest! {
        #[test]
        fn prop_distance_is_symmetric(
            lat1 in -90.0f64..90.0, lon1 in -180.0f64..180.0,
            lat2 in -90.0f64..90.0, lon2 in -180.0f64..180.0,
        ) {
            let ab = distance_km(lat1, lon1, lat2, lon2);
            let ba = distance_km(lat2, lon2, lat1, lon1);
            prop_assert!((ab - ba).abs() < 1e-6);
            prop_assert!(ab >= 0.0);
            prop_assert!(ab <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-6);
        }

        #[test]
        fn prop_duration_is_monotonic(a in 0.0f64..20_000.0, b in 0.0f64..20_000.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(estimate_flight_minutes(lo) <= estimate_flight_minutes(hi));
        }
    }
}
