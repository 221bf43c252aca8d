//! Zip-code zones read from GeoJSON.
//!
//! Supports the two geometry types found in postal-code boundary files,
//! `Polygon` and `MultiPolygon`, in lon/lat coordinates. Every zone is held
//! as a [`geo::MultiPolygon`]. Distances are measured in a local
//! equirectangular projection around the reference point, which is accurate
//! to well below a percent at city scale.

use std::path::Path;

use geo::{
    Centroid, Contains, Coord, EuclideanDistance, LineString, MapCoords, MultiPolygon, Point,
    Polygon,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::effects::AnnotatedEffect;
use crate::error::{MietkarteError, Result};

const EARTH_RADIUS_KM: f64 = 6371.0088;

/// The area covered by one zip code.
#[derive(Debug, Clone, PartialEq)]
pub struct ZipZone {
    pub zip: String,
    /// Boundary in lon/lat degrees.
    pub geometry: MultiPolygon<f64>,
    centroid: Point<f64>,
}

/// All zones of a boundary file keyed by zip, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZipZones {
    zones: IndexMap<String, ZipZone>,
}

/// A zone left-joined to its random effect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneEffect {
    pub zip: String,
    pub effect: Option<AnnotatedEffect>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoneDistance<'a> {
    pub zip: &'a str,
    pub km: f64,
}

/// Row of the map and distance charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneSummary {
    pub zip: String,
    pub lon: f64,
    pub lat: f64,
    pub pointestimate: Option<f64>,
    pub err: Option<f64>,
    pub significant: Option<f64>,
    pub multiplicative_effect: Option<f64>,
    pub distance_km: Option<f64>,
}

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    #[serde(default)]
    properties: serde_json::Map<String, Value>,
    geometry: Option<Geometry>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Vec<Vec<f64>>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Vec<f64>>>> },
    #[serde(other)]
    Unsupported,
}

impl ZipZones {
    /// Parses a GeoJSON FeatureCollection, reading the zip code from the
    /// feature property `zip_property`.
    ///
    /// Features sharing a zip code are merged into one zone.
    pub fn from_geojson(text: &str, zip_property: &str) -> Result<Self> {
        let collection: FeatureCollection = serde_json::from_str(text)?;
        let mut parts: IndexMap<String, Vec<Polygon<f64>>> = IndexMap::new();
        for (idx, feature) in collection.features.into_iter().enumerate() {
            let zip = match feature.properties.get(zip_property) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => {
                    return Err(MietkarteError::GeoJson(format!(
                        "feature {idx} has no `{zip_property}` property"
                    )));
                }
            };
            let polygons = match feature.geometry {
                Some(Geometry::Polygon { coordinates }) => {
                    vec![polygon_from_rings(coordinates, &zip)?]
                }
                Some(Geometry::MultiPolygon { coordinates }) => coordinates
                    .into_iter()
                    .map(|rings| polygon_from_rings(rings, &zip))
                    .collect::<Result<Vec<_>>>()?,
                Some(Geometry::Unsupported) | None => {
                    return Err(MietkarteError::GeoJson(format!(
                        "zone {zip}: expected Polygon or MultiPolygon geometry"
                    )));
                }
            };
            if parts.contains_key(&zip) {
                debug!(zip = %zip, "merging repeated zone");
            }
            parts.entry(zip).or_default().extend(polygons);
        }

        let zones = parts
            .into_iter()
            .map(|(zip, polygons)| {
                let zone = ZipZone::new(zip.clone(), MultiPolygon::new(polygons))?;
                Ok((zip, zone))
            })
            .collect::<Result<IndexMap<_, _>>>()?;
        debug!(zones = zones.len(), "loaded zip zones");
        Ok(Self { zones })
    }

    pub fn from_geojson_file(path: impl AsRef<Path>, zip_property: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_geojson(&text, zip_property)
    }

    pub fn get(&self, zip: &str) -> Option<&ZipZone> {
        self.zones.get(zip)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ZipZone> {
        self.zones.values()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn centroid(&self, zip: &str) -> Result<Point<f64>> {
        self.get(zip)
            .map(ZipZone::centroid)
            .ok_or_else(|| MietkarteError::UnknownZip(zip.to_string()))
    }

    /// Left join of zones to effects; unmatched zones get `None`.
    pub fn join_effects(&self, effects: &[AnnotatedEffect]) -> Vec<ZoneEffect> {
        let by_zip: IndexMap<&str, &AnnotatedEffect> =
            effects.iter().map(|e| (e.zip.as_str(), e)).collect();
        let unmatched = by_zip
            .keys()
            .filter(|zip| !self.zones.contains_key(**zip))
            .count();
        if unmatched > 0 {
            warn!(unmatched, "random effects without a matching zone");
        }

        self.zones
            .keys()
            .map(|zip| ZoneEffect {
                zip: zip.clone(),
                effect: by_zip.get(zip.as_str()).map(|e| (*e).clone()),
            })
            .collect()
    }

    /// Distance in km from the centroid of `reference_zip` to every zone.
    ///
    /// A zone containing the reference point is at distance zero.
    pub fn distances_from(&self, reference_zip: &str) -> Result<Vec<ZoneDistance<'_>>> {
        let origin = self.centroid(reference_zip)?;
        let projection = LocalProjection::centered_at(origin);
        Ok(self
            .zones
            .values()
            .map(|zone| ZoneDistance {
                zip: &zone.zip,
                km: zone.distance_km(origin, &projection),
            })
            .collect())
    }

    /// Joins effects and, when `reference_zip` is given, distances.
    pub fn summarize(
        &self,
        effects: &[AnnotatedEffect],
        reference_zip: Option<&str>,
    ) -> Result<Vec<ZoneSummary>> {
        let distances = match reference_zip {
            Some(zip) => Some(self.distances_from(zip)?),
            None => None,
        };
        Ok(self
            .join_effects(effects)
            .into_iter()
            .zip(self.zones.values())
            .enumerate()
            .map(|(idx, (joined, zone))| ZoneSummary {
                lon: zone.centroid.x(),
                lat: zone.centroid.y(),
                pointestimate: joined.effect.as_ref().map(|e| e.pointestimate),
                err: joined.effect.as_ref().map(|e| e.err),
                significant: joined.effect.as_ref().and_then(|e| e.significant),
                multiplicative_effect: joined
                    .effect
                    .as_ref()
                    .and_then(AnnotatedEffect::multiplicative_effect),
                distance_km: distances.as_ref().map(|d| d[idx].km),
                zip: joined.zip,
            })
            .collect())
    }
}

impl ZipZone {
    /// Builds a zone, failing when the geometry has no centroid.
    pub fn new(zip: String, geometry: MultiPolygon<f64>) -> Result<Self> {
        let centroid = geometry
            .centroid()
            .ok_or_else(|| MietkarteError::GeoJson(format!("zone {zip}: empty geometry")))?;
        Ok(Self {
            zip,
            geometry,
            centroid,
        })
    }

    /// Area-weighted centroid over all polygons, holes subtracted.
    pub fn centroid(&self) -> Point<f64> {
        self.centroid
    }

    /// Whether `point` lies in the interior of the zone.
    pub fn contains(&self, point: Point<f64>) -> bool {
        self.geometry.contains(&point)
    }

    fn distance_km(&self, origin: Point<f64>, projection: &LocalProjection) -> f64 {
        if self.contains(origin) {
            return 0.0;
        }
        let local = self.geometry.map_coords(|c| projection.project(c));
        Point::from(projection.project(origin.0)).euclidean_distance(&local)
    }
}

/// Equirectangular projection to kilometres, scaled at the origin latitude.
struct LocalProjection {
    cos_lat0: f64,
}

impl LocalProjection {
    fn centered_at(origin: Point<f64>) -> Self {
        Self {
            cos_lat0: origin.y().to_radians().cos(),
        }
    }

    fn project(&self, c: Coord<f64>) -> Coord<f64> {
        Coord {
            x: EARTH_RADIUS_KM * c.x.to_radians() * self.cos_lat0,
            y: EARTH_RADIUS_KM * c.y.to_radians(),
        }
    }
}

fn polygon_from_rings(rings: Vec<Vec<Vec<f64>>>, zip: &str) -> Result<Polygon<f64>> {
    let mut rings = rings.into_iter().map(|ring| {
        ring.into_iter()
            .map(|pos| match pos.as_slice() {
                [lon, lat, ..] => Ok(Coord { x: *lon, y: *lat }),
                _ => Err(MietkarteError::GeoJson(format!(
                    "zone {zip}: position with fewer than two coordinates"
                ))),
            })
            .collect::<Result<Vec<_>>>()
            .map(LineString::new)
    });
    let exterior = rings
        .next()
        .ok_or_else(|| MietkarteError::GeoJson(format!("zone {zip}: polygon without rings")))??;
    if exterior.0.len() < 3 {
        return Err(MietkarteError::GeoJson(format!(
            "zone {zip}: exterior ring needs at least three positions"
        )));
    }
    let holes = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, holes))
}
