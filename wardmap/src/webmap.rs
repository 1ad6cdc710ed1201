use crate::{options::Webmap, render::lerp_colors};
use anyhow::Result;
use geo::geometry::Point;
use geojson::{Feature, FeatureCollection, GeoJson};
use log::info;
use serde_json::Value as Json;
use std::{collections::BTreeMap, fs::File, path::Path};
use zonal::{count_points, wards, Ward};

/// Map center when the ward set has no extent: Liverpool city
/// center.
const FALLBACK_CENTER: (f64, f64) = (53.4084, -2.9916);

impl Webmap {
    pub fn run(&self) -> Result<()> {
        let wards = wards::from_geojson(&self.wards, &self.id_property, &self.name_property)?;
        let stops = match &self.stops {
            Some(path) => wards::points_from_geojson(path)?,
            None => Vec::new(),
        };
        let counts = count_points(&wards, &stops);
        let wards_layer = ward_collection(&wards, &counts).to_string();

        let center = wards::bounds(&wards).map_or(FALLBACK_CENTER, |rect| {
            (
                (rect.min().y + rect.max().y) / 2.0,
                (rect.min().x + rect.max().x) / 2.0,
            )
        });

        let parks = self.parks.as_deref().map(load_layer).transpose()?;
        let landuse = self.landuse.as_deref().map(load_layer).transpose()?;
        let water = self.water.as_deref().map(load_layer).transpose()?;

        let html = page(
            center,
            &wards_layer,
            parks.as_deref(),
            landuse.as_deref(),
            water.as_deref(),
            &stops,
        );
        std::fs::write(&self.out, html)?;
        info!("wrote interactive map to {:?}", self.out);
        Ok(())
    }
}

/// Parses and re-serializes a GeoJSON layer, so a malformed overlay
/// file fails the run instead of producing a silently broken page.
fn load_layer(path: &Path) -> Result<String> {
    let layer = GeoJson::from_reader(File::open(path)?)?;
    Ok(layer.to_string())
}

/// Wards re-emitted as GeoJSON with the computed choropleth
/// properties: name, bus stop count, and fill color.
fn ward_collection(wards: &[Ward], counts: &BTreeMap<u8, u64>) -> FeatureCollection {
    let max = counts.values().copied().max().unwrap_or(0).max(1);
    let features = wards
        .iter()
        .map(|ward| {
            let count = counts.get(&ward.id).copied().unwrap_or(0);
            #[allow(clippy::cast_precision_loss)]
            let fill = ylgn(count as f64 / max as f64);
            let mut properties = geojson::JsonObject::new();
            properties.insert("wardname".to_string(), Json::from(ward.name.clone()));
            properties.insert("bus_stop_count".to_string(), Json::from(count));
            properties.insert("fill".to_string(), Json::from(fill));
            Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::from(
                    &ward.boundary,
                ))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Yellow-to-green ramp (the YlGn scheme folium uses for its default
/// choropleths), as a CSS hex color.
fn ylgn(t: f64) -> String {
    const ANCHORS: [(u8, u8, u8); 5] = [
        (255, 255, 229),
        (217, 240, 163),
        (120, 198, 121),
        (35, 132, 67),
        (0, 69, 41),
    ];
    let (r, g, b) = lerp_colors(&ANCHORS, t);
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn page(
    (lat, lng): (f64, f64),
    wards_layer: &str,
    parks: Option<&str>,
    landuse: Option<&str>,
    water: Option<&str>,
    stops: &[Point<f64>],
) -> String {
    let mut html = String::with_capacity(wards_layer.len() + 8 * 1024);
    html.push_str(
        "<!DOCTYPE html>\n\
         <html>\n<head>\n<meta charset=\"utf-8\"/>\n<title>wardmap</title>\n\
         <link rel=\"stylesheet\" href=\"https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.css\"\n\
         \x20 crossorigin=\"anonymous\" referrerpolicy=\"no-referrer\"/>\n\
         <script src=\"https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.js\"\n\
         \x20 crossorigin=\"anonymous\" referrerpolicy=\"no-referrer\"></script>\n\
         <style>html, body, #map { height: 100%; margin: 0; }</style>\n\
         </head>\n<body>\n<div id=\"map\"></div>\n<script>\n",
    );

    html.push_str(&format!(
        "var map = L.map('map').setView([{lat}, {lng}], 12);\n"
    ));
    html.push_str(
        "L.tileLayer('https://tile.openstreetmap.org/{z}/{x}/{y}.png', {\n\
         \x20 maxZoom: 19,\n\
         \x20 attribution: '&copy; OpenStreetMap contributors'\n\
         }).addTo(map);\n\n",
    );

    html.push_str(&format!("var wardsData = {wards_layer};\n"));
    html.push_str(
        "var choropleth = L.geoJSON(wardsData, {\n\
         \x20 style: function (f) {\n\
         \x20   return {color: '#444', weight: 1, fillColor: f.properties.fill, fillOpacity: 0.7};\n\
         \x20 },\n\
         \x20 onEachFeature: function (f, layer) {\n\
         \x20   layer.bindTooltip(f.properties.wardname + ': ' + f.properties.bus_stop_count + ' bus stops');\n\
         \x20 }\n\
         }).addTo(map);\n\
         var wardLines = L.geoJSON(wardsData, {\n\
         \x20 style: {color: '#000', weight: 1, fillOpacity: 0},\n\
         \x20 onEachFeature: function (f, layer) { layer.bindTooltip(f.properties.wardname); }\n\
         });\n\
         var overlays = {'Bus stops per ward': choropleth, 'Wards': wardLines};\n\n",
    );

    if let Some(parks) = parks {
        html.push_str(&format!("var parksData = {parks};\n"));
        html.push_str(
            "overlays['Parks'] = L.geoJSON(parksData, {\n\
             \x20 style: {color: 'green', fillColor: 'green', weight: 1, fillOpacity: 0.6}\n\
             }).addTo(map);\n\n",
        );
    }

    if let Some(landuse) = landuse {
        html.push_str(&format!("var landuseData = {landuse};\n"));
        html.push_str(
            "overlays['Land use'] = L.geoJSON(landuseData, {\n\
             \x20 style: function (f) {\n\
             \x20   var c = {\n\
             \x20     'urban areas': 'gray',\n\
             \x20     'agricultural': 'khaki',\n\
             \x20     'natural vegetation': 'palegreen',\n\
             \x20     'parks': 'green'\n\
             \x20   }[f.properties.landuse] || 'darkgreen';\n\
             \x20   return {color: c, fillColor: c, weight: 1, fillOpacity: 0.6};\n\
             \x20 },\n\
             \x20 onEachFeature: function (f, layer) { layer.bindTooltip(f.properties.landuse); }\n\
             }).addTo(map);\n\n",
        );
    }

    if let Some(water) = water {
        html.push_str(&format!("var waterData = {water};\n"));
        html.push_str(
            "overlays['Water bodies'] = L.geoJSON(waterData, {\n\
             \x20 style: {color: 'blue', fillColor: 'blue', weight: 1, fillOpacity: 0.6}\n\
             }).addTo(map);\n\n",
        );
    }

    if !stops.is_empty() {
        let latlngs: Vec<[f64; 2]> = stops.iter().map(|p| [p.y(), p.x()]).collect();
        html.push_str(&format!(
            "var stopLatLngs = {};\n",
            serde_json::to_string(&latlngs).unwrap_or_else(|_| "[]".to_string())
        ));
        html.push_str(
            "overlays['Bus stops'] = L.layerGroup(stopLatLngs.map(function (p) {\n\
             \x20 return L.circleMarker(p, {\n\
             \x20   radius: 2, color: 'red', fill: true, fillColor: 'red', fillOpacity: 1\n\
             \x20 }).bindTooltip('Bus stop');\n\
             })).addTo(map);\n\n",
        );
    }

    html.push_str("L.control.layers(null, overlays).addTo(map);\n</script>\n</body>\n</html>\n");
    html
}
