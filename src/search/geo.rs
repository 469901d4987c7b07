use super::Coordinate;

/// Great-circle distance in kilometers (haversine, Earth radius 6371 km).
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let to_rad = |deg: f64| deg.to_radians();
    let dlat = to_rad(lat2 - lat1);
    let dlon = to_rad(lon2 - lon1);
    let a = (dlat / 2.0).sin().powi(2)
        + to_rad(lat1).cos() * to_rad(lat2).cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    6371.0 * c
}

pub fn distance_between(a: Coordinate, b: Coordinate) -> f64 {
    haversine_km(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Coarse lat/lon box around a center, used to pre-trim SQL candidates before
/// the exact haversine cut. Returns (min_lat, max_lat, min_lon, max_lon).
pub fn bounding_box(lat: f64, lon: f64, radius_km: f64) -> (f64, f64, f64, f64) {
    let lat_change = radius_km / 111.0;
    let lat_rad = lat.to_radians();
    let lon_change = (radius_km / 111.0) / lat_rad.cos().abs();

    (
        lat - lat_change,
        lat + lat_change,
        lon - lon_change,
        lon + lon_change,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sao_paulo_to_rio() {
        // Praça da Sé to Centro do Rio, roughly 360 km.
        let d = haversine_km(-23.55, -46.63, -22.90, -43.17);
        assert!(d > 340.0 && d < 380.0, "got {}", d);
    }

    #[test]
    fn zero_distance_for_same_point() {
        let d = haversine_km(-23.55, -46.63, -23.55, -46.63);
        assert!(d.abs() < 1e-9);
    }

    #[test]
    fn bounding_box_contains_center_offset() {
        let (min_lat, max_lat, min_lon, max_lon) = bounding_box(-23.55, -46.63, 10.0);
        assert!(min_lat < -23.55 && -23.55 < max_lat);
        assert!(min_lon < -46.63 && -46.63 < max_lon);
        // A point just inside the radius stays inside the box.
        assert!(min_lat < -23.60 && -23.60 < max_lat);
    }
}
