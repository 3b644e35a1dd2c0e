use proptest::prelude::*;
use triage_analysis::classifier::builtin::technique_tier;
use triage_analysis::{
    resolve_case, AppliedGuard, AppliedSanitizer, CaseVerdict, EntryDescriptor, GuardCategory,
    LivenessFlag, Node, NodeRole, Path, PathVerdict, SanitizerTechnique, SinkKind,
    SourceLocation, VulnerabilityCase,
};

#[derive(Debug, Clone)]
struct PathShape {
    dead: bool,
    sanitizers: Vec<SanitizerTechnique>,
    guards: Vec<GuardCategory>,
}

fn technique() -> impl Strategy<Value = SanitizerTechnique> {
    proptest::sample::select(SanitizerTechnique::all().to_vec())
}

fn guard_category() -> impl Strategy<Value = GuardCategory> {
    prop_oneof![
        Just(GuardCategory::Authentication),
        Just(GuardCategory::Authorization),
        Just(GuardCategory::RateLimit),
        Just(GuardCategory::Csrf),
        Just(GuardCategory::Other),
    ]
}

fn path_shape() -> impl Strategy<Value = PathShape> {
    (
        any::<bool>(),
        prop::collection::vec(technique(), 0..3),
        prop::collection::vec(guard_category(), 0..4),
    )
        .prop_map(|(dead, sanitizers, guards)| PathShape {
            dead,
            sanitizers,
            guards,
        })
}

fn at(line: u32) -> SourceLocation {
    SourceLocation::new("app.py", line)
}

fn build_path(index: usize, shape: &PathShape) -> Path {
    let mut nodes = vec![Node::new(NodeRole::Entry, "handler", at(1))];
    let mut sanitizers = Vec::new();
    for (i, technique) in shape.sanitizers.iter().enumerate() {
        let identity = format!("sanitizer_{i}");
        let node = Node::new(NodeRole::Sanitizer, identity, at(10 + i as u32));
        let (strength, category) = technique_tier(*technique);
        sanitizers.push(AppliedSanitizer {
            node: node.clone(),
            strength,
            category,
            technique: Some(*technique),
            position: Some(nodes.len()),
        });
        nodes.push(node);
    }
    nodes.push(Node::new(NodeRole::Sink, "cursor.execute", at(99)));

    let guards = shape
        .guards
        .iter()
        .enumerate()
        .map(|(i, category)| AppliedGuard {
            node: Node::new(NodeRole::Guard, format!("guard_{i}"), at(2)),
            category: *category,
        })
        .collect();
    let flags = if shape.dead {
        vec![LivenessFlag::required("feature_enabled", false)]
    } else {
        vec![]
    };

    Path::new("prop", format!("p{index}"), nodes, flags, sanitizers, guards, vec![]).unwrap()
}

fn build_case(shapes: &[PathShape]) -> VulnerabilityCase {
    let paths = shapes.iter().enumerate().map(|(i, s)| build_path(i, s)).collect();
    VulnerabilityCase::new(
        "prop",
        SinkKind::SqlInjection,
        EntryDescriptor {
            handler: "handler".to_string(),
            route: None,
            location: at(1),
        },
        paths,
        None,
    )
    .unwrap()
}

proptest! {
    #[test]
    fn permuting_paths_keeps_overall(
        shapes in prop::collection::vec(path_shape(), 1..6),
        seed in any::<u64>(),
    ) {
        let original = resolve_case(&build_case(&shapes));

        let mut permuted = shapes.clone();
        let n = permuted.len();
        let mut state = seed;
        for i in (1..n).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            permuted.swap(i, (state >> 33) as usize % (i + 1));
        }
        let shuffled = resolve_case(&build_case(&permuted));

        prop_assert_eq!(original.overall, shuffled.overall);
        prop_assert!((original.confidence - shuffled.confidence).abs() < 1e-12);
    }

    #[test]
    fn resolution_is_idempotent(shapes in prop::collection::vec(path_shape(), 1..6)) {
        let case = build_case(&shapes);
        prop_assert_eq!(resolve_case(&case), resolve_case(&case));
    }

    #[test]
    fn must_fix_iff_unmitigated_path(shapes in prop::collection::vec(path_shape(), 1..6)) {
        let r = resolve_case(&build_case(&shapes));
        let unmitigated = r
            .paths
            .iter()
            .any(|p| p.verdict == PathVerdict::Exploitable && !p.weakly_mitigated);
        prop_assert_eq!(r.overall == CaseVerdict::MustFix, unmitigated);
    }

    #[test]
    fn all_dead_is_dead_code(shapes in prop::collection::vec(path_shape(), 1..6)) {
        let dead: Vec<PathShape> = shapes
            .into_iter()
            .map(|s| PathShape { dead: true, ..s })
            .collect();
        let r = resolve_case(&build_case(&dead));
        prop_assert_eq!(r.overall, CaseVerdict::FalsePositiveDeadCode);
        prop_assert!(r.confidence >= 0.90);
    }

    #[test]
    fn confidence_stays_in_band(shapes in prop::collection::vec(path_shape(), 1..6)) {
        let r = resolve_case(&build_case(&shapes));
        let (lo, hi) = match r.overall {
            CaseVerdict::MustFix => (0.90, 0.95),
            CaseVerdict::GoodToFix => (0.70, 0.80),
            CaseVerdict::FalsePositiveDeadCode => (0.90, 1.0),
            _ => (0.85, 1.0),
        };
        prop_assert!(r.confidence >= lo - 1e-12 && r.confidence <= hi + 1e-12);
    }
}
