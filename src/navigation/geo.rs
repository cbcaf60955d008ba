//! Great-circle calculations on a spherical earth

use crate::common::types::GeoPoint;

/// Mean earth radius used by the haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers
pub fn great_circle_distance_km(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let sin_dlat = (delta_lat / 2.0).sin();
    let sin_dlng = (delta_lng / 2.0).sin();
    let a = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlng * sin_dlng;
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Initial bearing from `from` to `to`, degrees clockwise from north in [0, 360)
pub fn bearing_to(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let y = delta_lng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lng.cos();

    wrap_360(y.atan2(x).to_degrees())
}

/// Point reached by travelling `distance_m` from `from` along `bearing` degrees
pub fn offset_position(from: GeoPoint, bearing: f64, distance_m: f64) -> GeoPoint {
    let angular = distance_m / (EARTH_RADIUS_KM * 1000.0);
    let theta = bearing.to_radians();
    let lat1 = from.lat.to_radians();
    let lng1 = from.lng.to_radians();

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * theta.cos()).asin();
    let lng2 = lng1
        + (theta.sin() * angular.sin() * lat1.cos()).atan2(angular.cos() - lat1.sin() * lat2.sin());

    GeoPoint::new(lat2.to_degrees(), wrap_180(lng2.to_degrees()))
}

/// Reduce an angle into [-180, 180)
pub fn wrap_180(angle: f64) -> f64 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

/// Reduce an angle into [0, 360)
pub fn wrap_360(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}
