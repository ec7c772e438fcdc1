use std::sync::Arc;

use layertree::addressing::resolve;
use layertree::legend::{legend_url, LegendOptions};
use layertree::model::{Layer, LayerNode, Leaf};
use layertree::ops::{change_opacity, slider_value, toggle_group, toggle_leaf};
use layertree::params::build_params;
use layertree::session::{Intent, LayerTreeSession};
use layertree::store::{LayerStore, MemoryStore};
use layertree::url::UrlParams;
use layertree::view::TreeItem;
use layertree::visibility::{effective_visibility, layer_visibility, Tristate};
use layertree::{MenuKey, TreeError};

fn node<'a>(layer: &'a Layer, path: &[usize]) -> &'a LayerNode {
    resolve(layer, path)
        .expect("resolve")
        .as_node()
        .expect("node")
}

fn overlay() -> Layer {
    Layer::new(
        "L",
        vec![
            LayerNode::group(
                "G",
                vec![LayerNode::leaf("X", false), LayerNode::leaf("Y", true)],
            ),
            LayerNode::group(
                "H",
                vec![
                    LayerNode::leaf("P", true),
                    LayerNode::group("K", vec![LayerNode::leaf("Q", true)]),
                ],
            ),
        ],
    )
}

#[test]
fn scenario_toggle_hidden_leaf() {
    let layer = Layer::new(
        "L",
        vec![LayerNode::group(
            "G",
            vec![LayerNode::leaf("X", false), LayerNode::leaf("Y", true)],
        )],
    );
    assert_eq!(effective_visibility(node(&layer, &[0])), 0.5);
    assert_eq!(Tristate::of(node(&layer, &[0])), Tristate::Mixed);
    assert_eq!(layer.params.layers, vec!["Y"]);

    let edit = toggle_leaf(&layer, &[0, 0]).unwrap();
    assert_eq!(effective_visibility(node(&edit.layer, &[0])), 1.0);
    assert_eq!(Tristate::of(node(&edit.layer, &[0])), Tristate::Checked);
    assert_eq!(edit.layer.params.layers, vec!["X", "Y"]);
    assert_eq!(edit.url_patch.unwrap().get("l"), Some("X,Y"));

    // the input is a snapshot
    assert_eq!(effective_visibility(node(&layer, &[0])), 0.5);
    assert_eq!(layer.params.layers, vec!["Y"]);
}

#[test]
fn params_keep_depth_first_order() {
    let layer = Layer::new(
        "L",
        vec![
            LayerNode::leaf("A", true),
            LayerNode::leaf("B", false),
            LayerNode::leaf("C", true),
        ],
    );
    assert_eq!(layer.params.layers, vec!["A", "C"]);
    assert_eq!(layer.params.layers_string(), "A,C");

    let nested = Layer::new(
        "N",
        vec![
            LayerNode::group("g1", vec![LayerNode::leaf("b", true), LayerNode::leaf("a", true)]),
            LayerNode::leaf("c", true),
            LayerNode::group("g2", vec![LayerNode::leaf("d", true)]),
        ],
    );
    assert_eq!(nested.params.layers, vec!["b", "a", "c", "d"]);
}

#[test]
fn params_carry_opacities_and_query_layers() {
    let layer = Layer::new(
        "L",
        vec![
            Leaf::new("a").visible(true).opacity(100).queryable(true).into(),
            Leaf::new("b").visible(false).queryable(true).into(),
            Leaf::new("c").visible(true).into(),
        ],
    );
    assert_eq!(layer.params.opacities, vec![100, 255]);
    assert_eq!(layer.params.query_layers, vec!["a"]);
    assert_eq!(build_params(&layer.sublayers), layer.params);
}

#[test]
fn opacity_slider_round_trip() {
    let layer = overlay();
    let edit = change_opacity(&layer, &[0, 1], 100).unwrap();
    let leaf = node(&edit.layer, &[0, 1]).as_leaf().unwrap();
    assert_eq!(leaf.opacity, 155);
    assert_eq!(slider_value(leaf.opacity), 100);
    assert!(edit.url_patch.is_none());

    for value in [0u8, 1, 128, 254, 255] {
        let edit = change_opacity(&layer, &[0, 1], value).unwrap();
        let leaf = node(&edit.layer, &[0, 1]).as_leaf().unwrap();
        assert_eq!(slider_value(leaf.opacity), value);
    }
}

#[test]
fn root_group_toggle_flips_only_layer_flag() {
    let layer = overlay();
    let edit = toggle_group(&layer, &[]).unwrap();
    assert!(!edit.layer.visibility);
    assert!(edit.url_patch.is_none());
    assert_eq!(edit.layer.params, layer.params);
    assert_eq!(layer_visibility(&edit.layer), layer_visibility(&layer));
    for (a, b) in edit.layer.sublayers.iter().zip(&layer.sublayers) {
        assert!(Arc::ptr_eq(a, b));
    }

    let back = toggle_group(&edit.layer, &[]).unwrap();
    assert_eq!(back.layer, layer);
}

#[test]
fn interior_group_toggle_policy() {
    let layer = overlay();

    // mixed -> all visible
    let shown = toggle_group(&layer, &[0]).unwrap();
    assert_eq!(effective_visibility(node(&shown.layer, &[0])), 1.0);
    assert!(Arc::ptr_eq(&shown.layer.sublayers[1], &layer.sublayers[1]));
    assert_eq!(shown.layer.params.layers, vec!["X", "Y", "P", "Q"]);
    assert_eq!(shown.url_patch.unwrap().get("l"), Some("X,Y,P,Q"));

    // all visible -> all hidden, including nested groups
    let hidden = toggle_group(&layer, &[1]).unwrap();
    assert_eq!(effective_visibility(node(&hidden.layer, &[1])), 0.0);
    assert_eq!(effective_visibility(node(&hidden.layer, &[1, 1])), 0.0);
    assert!(Arc::ptr_eq(&hidden.layer.sublayers[0], &layer.sublayers[0]));
    assert_eq!(hidden.layer.params.layers, vec!["Y"]);

    // all hidden -> all visible
    let again = toggle_group(&hidden.layer, &[1]).unwrap();
    assert_eq!(again.layer.params.layers, layer.params.layers);
}

#[test]
fn interior_group_toggle_on_empty_group_is_a_no_op() {
    let layer = Layer::new(
        "L",
        vec![LayerNode::group("empty", vec![]), LayerNode::leaf("a", true)],
    );
    let edit = toggle_group(&layer, &[0]).unwrap();
    assert_eq!(edit.layer, layer);
    assert!(edit.url_patch.is_none());
}

#[test]
fn invalid_paths_fail_and_leave_input_unchanged() {
    let layer = overlay();
    let before = layer.clone();

    let cases: [(&[usize], TreeError); 4] = [
        (
            &[5],
            TreeError::OutOfRange {
                depth: 0,
                index: 5,
                len: 2,
            },
        ),
        (
            &[0, 9],
            TreeError::OutOfRange {
                depth: 1,
                index: 9,
                len: 2,
            },
        ),
        (&[0, 0, 0], TreeError::NotAGroup { depth: 2 }),
        (&[1], TreeError::NotALeaf),
    ];
    for (path, expected) in cases {
        assert_eq!(toggle_leaf(&layer, path).unwrap_err(), expected, "path {path:?}");
    }
    assert_eq!(toggle_leaf(&layer, &[]).unwrap_err(), TreeError::EmptyPath);
    assert_eq!(
        toggle_group(&layer, &[0, 0]).unwrap_err(),
        TreeError::ExpectedGroup
    );
    assert_eq!(change_opacity(&layer, &[0], 10).unwrap_err(), TreeError::NotALeaf);
    assert_eq!(layer, before);
}

#[test]
fn legend_url_matrix() {
    let leaf = LayerNode::leaf("roads", true);
    let wms = Layer::new("w", vec![leaf.clone()]).wms("http://h/wms");
    assert_eq!(
        legend_url(&wms, &leaf, &LegendOptions::default()),
        "http://h/wms?SERVICE=WMS&REQUEST=GetLegendGraphic&VERSION=1.3.0&FORMAT=image/png&LAYER=roads"
    );

    let plain = Layer::new("p", vec![leaf.clone()]);
    assert_eq!(legend_url(&plain, &leaf, &LegendOptions::default()), "");

    let tiles: Layer = serde_json::from_value(serde_json::json!({
        "id": "t", "type": "wmts", "url": "http://h/wmts", "sublayers": []
    }))
    .unwrap();
    assert_eq!(legend_url(&tiles, &leaf, &LegendOptions::default()), "");
}

#[test]
fn session_drives_store_url_and_view() {
    let layer = overlay().wms("http://h/wms");
    let mut session = LayerTreeSession::new(
        MemoryStore::new(vec![layer]),
        UrlParams::from_query("?zoom=4"),
    );

    let intents: Vec<Intent> = serde_json::from_str(
        r#"[
            {"op": "toggle_leaf", "layer": "L", "path": [0, 0]},
            {"op": "toggle_edit_menu", "key": "L/0/0"},
            {"op": "change_opacity", "layer": "L", "path": [0, 0], "value": 55},
            {"op": "toggle_edit_menu", "key": "L/0/1"}
        ]"#,
    )
    .unwrap();
    for intent in &intents {
        session.apply(intent).unwrap();
    }

    assert_eq!(session.url().to_query(), "zoom=4&l=X%2CY%2CP%2CQ");
    assert_eq!(session.menu().active(), Some(&MenuKey::new("L", &[0, 1])));

    let view = session.render();
    let TreeItem::Group(g) = &view.layers[0].root.children[0] else {
        panic!("expected group");
    };
    let TreeItem::Leaf(x) = &g.children[0] else {
        panic!("expected leaf");
    };
    assert!(x.checked);
    assert!(!x.menu_open);
    assert_eq!(x.slider_value, 55);
    let TreeItem::Leaf(y) = &g.children[1] else {
        panic!("expected leaf");
    };
    assert!(y.menu_open);

    let (store, _) = session.into_parts();
    assert_eq!(store.layer("L").unwrap().params.opacities, vec![200, 255, 255, 255]);
}

#[test]
fn menu_toggle_single_selection() {
    let mut session = LayerTreeSession::new(MemoryStore::new(vec![overlay()]), UrlParams::new());
    let first = MenuKey::new("L", &[0, 0]);
    let second = MenuKey::new("L", &[0, 1]);
    assert_eq!(session.toggle_edit_menu("L/0/0").unwrap(), Some(&first));
    assert_eq!(session.toggle_edit_menu("L/0/1").unwrap(), Some(&second));
    assert!(!session.menu().is_open("L", &[0, 0]));
    assert_eq!(session.toggle_edit_menu("L/0/1").unwrap(), None);
    assert!(session.url().is_empty());
}

#[test]
fn layers_loaded_from_json_carry_derived_params() {
    let layers: Vec<Layer> = serde_json::from_str(
        r#"[{"id": "L", "sublayers": [
            {"name": "a", "visibility": true},
            {"name": "b"}
        ]}]"#,
    )
    .unwrap();
    let session = LayerTreeSession::new(MemoryStore::new(layers), UrlParams::new());
    let layer = session.store().layer("L").unwrap();
    assert_eq!(layer.params, build_params(&layer.sublayers));
    assert_eq!(layer.params.layers, vec!["a"]);
}
