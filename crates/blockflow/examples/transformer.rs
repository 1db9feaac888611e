//! Builds the MedCode-Transformer architecture diagram in code and writes a
//! self-animating SVG next to a single settled frame.
//!
//! ```text
//! cargo run -p blockflow --example transformer -- out_dir
//! ```

use std::{env, fs, path::PathBuf};

use blockflow::{
    BlockflowError, SceneBuilder,
    config::AppConfig,
    definition::{EdgeDefinition, NodeDefinition, SceneDefinition},
    model::{EdgeKind, NodeRole, RoutingStyle},
};

struct Block {
    id: &'static str,
    role: NodeRole,
    label: &'static str,
    sublabel: &'static str,
    frame: (f32, f32, f32, f32),
    depth: f32,
    color: &'static str,
    stack_count: Option<u32>,
    icon: Option<&'static str>,
}

const BLOCKS: &[Block] = &[
    Block {
        id: "medical-input",
        role: NodeRole::Input,
        label: "Medical Text Input",
        sublabel: "Clinical narratives",
        frame: (340.0, 30.0, 220.0, 50.0),
        depth: 15.0,
        color: "#F8FAFC",
        stack_count: None,
        icon: Some("¶"),
    },
    Block {
        id: "hybrid-tokenizer",
        role: NodeRole::Tokenizer,
        label: "Hybrid Tokenizer",
        sublabel: "100K vocab (BPE + ICD)",
        frame: (315.0, 110.0, 270.0, 60.0),
        depth: 25.0,
        color: "#6366F1",
        stack_count: None,
        icon: Some("⚙"),
    },
    Block {
        id: "factorized-embedding",
        role: NodeRole::Embedding,
        label: "Factorized Embedding",
        sublabel: "V(100K) → E(256)",
        frame: (220.0, 210.0, 180.0, 55.0),
        depth: 20.0,
        color: "#10B981",
        stack_count: None,
        icon: None,
    },
    Block {
        id: "linear-projection",
        role: NodeRole::Projection,
        label: "Linear Projection",
        sublabel: "E(256) → H(1024)",
        frame: (430.0, 210.0, 180.0, 55.0),
        depth: 20.0,
        color: "#059669",
        stack_count: None,
        icon: None,
    },
    Block {
        id: "encoder-stack",
        role: NodeRole::Encoder,
        label: "MCT Encoder Stack",
        sublabel: "20 Layers • 241.2M params",
        frame: (260.0, 310.0, 380.0, 100.0),
        depth: 40.0,
        color: "#3B82F6",
        stack_count: Some(20),
        icon: Some("≡"),
    },
    Block {
        id: "classification-head",
        role: NodeRole::Classification,
        label: "Classification Head",
        sublabel: "H(1024) → Classes",
        frame: (550.0, 460.0, 160.0, 55.0),
        depth: 25.0,
        color: "#F59E0B",
        stack_count: None,
        icon: Some("#"),
    },
    Block {
        id: "icd-predictions",
        role: NodeRole::Classification,
        label: "ICD-10 Predictions",
        sublabel: "Hierarchical codes",
        frame: (550.0, 545.0, 160.0, 55.0),
        depth: 20.0,
        color: "#DC2626",
        stack_count: None,
        icon: Some("◎"),
    },
    Block {
        id: "decoder-stack",
        role: NodeRole::Decoder,
        label: "MCT Decoder Stack",
        sublabel: "7 Layers • 117.5M params",
        frame: (190.0, 460.0, 300.0, 85.0),
        depth: 35.0,
        color: "#8B5CF6",
        stack_count: Some(7),
        icon: Some("⋈"),
    },
    Block {
        id: "output-projection",
        role: NodeRole::Generation,
        label: "Output Projection",
        sublabel: "H(1024) → E(256)",
        frame: (120.0, 580.0, 150.0, 50.0),
        depth: 20.0,
        color: "#7C3AED",
        stack_count: None,
        icon: None,
    },
    Block {
        id: "lm-head",
        role: NodeRole::Generation,
        label: "LM Head",
        sublabel: "E(256) → V(100K)",
        frame: (290.0, 580.0, 150.0, 50.0),
        depth: 20.0,
        color: "#6D28D9",
        stack_count: None,
        icon: None,
    },
    Block {
        id: "text-generation",
        role: NodeRole::Generation,
        label: "Synthetic Text",
        sublabel: "Medical narratives",
        frame: (205.0, 660.0, 150.0, 45.0),
        depth: 15.0,
        color: "#5B21B6",
        stack_count: None,
        icon: Some("¶"),
    },
];

const FLOWS: &[(&str, &str, EdgeKind, RoutingStyle)] = &[
    ("medical-input", "hybrid-tokenizer", EdgeKind::Primary, RoutingStyle::Straight),
    ("hybrid-tokenizer", "factorized-embedding", EdgeKind::Primary, RoutingStyle::Straight),
    ("hybrid-tokenizer", "linear-projection", EdgeKind::Primary, RoutingStyle::Straight),
    ("factorized-embedding", "encoder-stack", EdgeKind::Primary, RoutingStyle::Straight),
    ("linear-projection", "encoder-stack", EdgeKind::Primary, RoutingStyle::Straight),
    ("encoder-stack", "classification-head", EdgeKind::Classification, RoutingStyle::CurvedRight),
    ("classification-head", "icd-predictions", EdgeKind::Classification, RoutingStyle::Straight),
    ("encoder-stack", "decoder-stack", EdgeKind::Attention, RoutingStyle::CurvedLeft),
    ("decoder-stack", "output-projection", EdgeKind::Generation, RoutingStyle::Straight),
    ("output-projection", "lm-head", EdgeKind::Generation, RoutingStyle::Straight),
    ("lm-head", "text-generation", EdgeKind::Generation, RoutingStyle::Straight),
];

fn definition() -> SceneDefinition {
    let mut scene = SceneDefinition::new();
    for block in BLOCKS {
        let (x, y, width, height) = block.frame;
        let mut node = NodeDefinition::new(block.id, block.role, block.label, x, y, width, height)
            .with_sublabel(block.sublabel)
            .with_depth(block.depth)
            .with_color(block.color);
        if let Some(count) = block.stack_count {
            node = node.with_stack_count(count);
        }
        if let Some(icon) = block.icon {
            node = node.with_icon(icon);
        }
        scene = scene.with_node(node);
    }
    for &(from, to, kind, routing) in FLOWS {
        scene = scene.with_edge(
            EdgeDefinition::new(from, to)
                .with_kind(kind)
                .with_routing(routing),
        );
    }
    scene
}

fn main() -> Result<(), BlockflowError> {
    let out_dir = env::args().nth(1).map_or_else(|| PathBuf::from("."), PathBuf::from);

    let scene = SceneBuilder::new(AppConfig::default()).build(&definition())?;

    let frame = scene.render_frame(scene.settle_time())?;
    fs::write(out_dir.join("medcode_transformer.svg"), frame)?;

    let animated = scene.render_animated()?;
    fs::write(out_dir.join("medcode_transformer_animated.svg"), animated)?;

    println!(
        "Wrote {} blocks and {} flows to {}",
        scene.diagram().node_count(),
        scene.diagram().edges().len(),
        out_dir.display()
    );
    Ok(())
}
