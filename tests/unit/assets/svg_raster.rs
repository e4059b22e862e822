use super::*;

fn tree(svg: &str) -> usvg::Tree {
    usvg::Tree::from_data(svg.as_bytes(), &usvg::Options::default()).unwrap()
}

#[test]
fn raster_size_contain_fits_canvas() {
    let t = tree(r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50"></svg>"#);
    let canvas = Canvas::new(800, 600).unwrap();
    assert_eq!(svg_raster_size(&t, canvas).unwrap(), (800, 400));

    let tall = tree(r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="30"></svg>"#);
    assert_eq!(svg_raster_size(&tall, canvas).unwrap(), (200, 600));
}

#[test]
fn rasterize_fills_solid_rect() {
    let t = tree(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4">
            <rect width="4" height="4" fill="#ff0000"/>
        </svg>"##,
    );
    let img = rasterize_svg(&t, 8, 8).unwrap();
    assert_eq!((img.width, img.height), (8, 8));
    let center = (4 * 8 + 4) * 4;
    assert_eq!(&img.rgba8_premul[center..center + 4], &[255, 0, 0, 255]);
}
