//! Visualization utilities for TSP tours.
//!
//! Generates SVG drawings of a tour and plain-text exports for plotting.

use crate::instance::TspInstance;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// SVG visualization generator
pub struct Visualizer {
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
    /// Margin
    pub margin: f64,
    /// City radius
    pub node_radius: f64,
}

impl Default for Visualizer {
    fn default() -> Self {
        Visualizer {
            width: 800.0,
            height: 800.0,
            margin: 50.0,
            node_radius: 6.0,
        }
    }
}

impl Visualizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate SVG visualization of a closed tour
    pub fn generate_svg(&self, instance: &TspInstance, tour: &[usize]) -> String {
        let mut svg = String::new();

        let (min_x, max_x, min_y, max_y) = self.get_bounds(instance);

        let scale_x = (self.width - 2.0 * self.margin) / (max_x - min_x).max(1.0);
        let scale_y = (self.height - 2.0 * self.margin) / (max_y - min_y).max(1.0);
        let scale = scale_x.min(scale_y);

        svg.push_str(&format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
<style>
    .node {{ fill: #3498db; stroke: #2c3e50; stroke-width: 2; }}
    .start {{ fill: #e74c3c; stroke: #c0392b; stroke-width: 2; }}
    .edge {{ stroke: #34495e; stroke-width: 2; fill: none; }}
    .label {{ font-family: Arial; font-size: 10px; fill: #2c3e50; }}
    .title {{ font-family: Arial; font-size: 14px; fill: #2c3e50; font-weight: bold; }}
</style>
<rect width="100%" height="100%" fill="#ecf0f1"/>
"##,
            self.width, self.height, self.width, self.height
        ));

        svg.push_str(&format!(
            r##"<text x="{}" y="25" class="title">Instance: {} | Cities: {} | Distance: {:.2}</text>
"##,
            self.margin,
            instance.name,
            instance.dimension(),
            instance.total_distance(tour)
        ));

        let transform = |x: f64, y: f64| -> (f64, f64) {
            let tx = self.margin + (x - min_x) * scale;
            let ty = self.height - self.margin - (y - min_y) * scale;
            (tx, ty)
        };

        svg.push_str(r##"<defs>
<marker id="arrow" markerWidth="10" markerHeight="10" refX="9" refY="3" orient="auto" markerUnits="strokeWidth">
<path d="M0,0 L0,6 L9,3 z" fill="#34495e"/>
</marker>
</defs>
"##);

        if tour.len() > 1 {
            for i in 0..tour.len() {
                let from = instance.city(tour[i]);
                let to = instance.city(tour[(i + 1) % tour.len()]);

                let (x1, y1) = transform(from.x, from.y);
                let (x2, y2) = transform(to.x, to.y);

                svg.push_str(&format!(
                    r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" class="edge" marker-end="url(#arrow)"/>
"#,
                    x1, y1, x2, y2
                ));
            }
        }

        for (id, city) in instance.cities().iter().enumerate() {
            let (x, y) = transform(city.x, city.y);
            let class = if tour.first() == Some(&id) { "start" } else { "node" };

            svg.push_str(&format!(
                r##"<circle cx="{:.2}" cy="{:.2}" r="{}" class="{}"/>
"##,
                x, y, self.node_radius, class
            ));

            svg.push_str(&format!(
                r##"<text x="{:.2}" y="{:.2}" class="label" text-anchor="middle">{}</text>
"##,
                x,
                y - self.node_radius - 3.0,
                id
            ));
        }

        svg.push_str("</svg>");

        svg
    }

    /// Save SVG to file
    pub fn save_svg<P: AsRef<Path>>(&self, svg: &str, path: P) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(svg.as_bytes())?;
        Ok(())
    }

    /// Get coordinate bounds
    fn get_bounds(&self, instance: &TspInstance) -> (f64, f64, f64, f64) {
        let stats = instance.statistics();
        (stats.min_x, stats.max_x, stats.min_y, stats.max_y)
    }

    /// Export data for external plotting (e.g., matplotlib)
    pub fn export_plot_data(&self, instance: &TspInstance, tour: &[usize]) -> String {
        let mut data = String::new();

        data.push_str("# TSP Tour Data\n");
        data.push_str(&format!("# Instance: {}\n", instance.name));
        data.push_str(&format!("# Distance: {:.2}\n\n", instance.total_distance(tour)));

        data.push_str("# Cities: id, x, y\n");
        for (id, city) in instance.cities().iter().enumerate() {
            data.push_str(&format!("{},{},{}\n", id, city.x, city.y));
        }

        data.push_str("\n# Tour: sequence of city ids\n");
        let tour_str: Vec<String> = tour.iter().map(|n| n.to_string()).collect();
        data.push_str(&tour_str.join(","));
        data.push('\n');

        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::City;

    fn create_test_instance() -> TspInstance {
        TspInstance::from_cities(
            "test",
            vec![City::new(0.0, 0.0), City::new(1.0, 0.0), City::new(0.0, 1.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_visualizer() {
        let instance = create_test_instance();

        let viz = Visualizer::new();
        let svg = viz.generate_svg(&instance, &[0, 1, 2]);

        assert!(svg.contains("svg"));
        assert!(svg.contains("test"));
        assert_eq!(svg.matches("<line").count(), 3);
        assert_eq!(svg.matches("class=\"start\"").count(), 1);
    }

    #[test]
    fn test_plot_data() {
        let instance = create_test_instance();
        let data = Visualizer::new().export_plot_data(&instance, &[2, 0, 1]);
        assert!(data.contains("2,0,1\n"));
        assert!(data.contains("1,1,0\n"));
    }
}
