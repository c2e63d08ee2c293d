//! Motorcycle model → (displacement, category) lookup
//!
//! Keys are matched loose-normalized; space-stripped variants ("cg160" for
//! "cg 160") are generated at table build so feeds that glue the code
//! together still resolve. Lookup probes the model first, then the trim, and
//! finally both concatenated, with the most specific contained fragment
//! winning.

use crate::search::normalize;
use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// (model fragment, displacement in cc, category)
const MOTO_MODELS: &[(&str, u32, &str)] = &[
    // street
    ("dk 150", 150, "street"),
    ("speed 400", 400, "street"),
    ("fan flex", 160, "street"),
    ("fz15 150", 150, "street"),
    ("xy 150", 150, "street"),
    ("cg 150 sport", 150, "street"),
    ("ys 150 fazer", 150, "street"),
    ("dk 160", 160, "street"),
    ("cg 150 titan", 150, "street"),
    ("cg 160 titan", 160, "street"),
    ("cg 125", 125, "street"),
    ("cg 160", 160, "street"),
    ("cg 160 fan", 160, "street"),
    ("cg 160 start", 160, "street"),
    ("cg 160 titan s", 160, "street"),
    ("cg 125 fan ks", 125, "street"),
    ("cg 150 fan", 150, "street"),
    ("cg 150 fan esdi", 150, "street"),
    ("ybr 150", 150, "street"),
    ("ybr 125", 125, "street"),
    ("factor 125", 125, "street"),
    ("factor 150", 150, "street"),
    ("fz 25", 250, "street"),
    ("fz 25 fazer", 250, "street"),
    ("fz 15 fazer", 150, "street"),
    ("fazer 150", 150, "street"),
    ("fazer 250", 250, "street"),
    ("ys 250", 250, "street"),
    ("cb 300", 300, "street"),
    ("cb twister", 300, "street"),
    ("twister", 300, "street"),
    ("fz6", 150, "street"),
    // scooter
    ("sh 300", 300, "scooter"),
    ("lead 110", 110, "scooter"),
    ("biz 125", 125, "scooter"),
    ("jet 50", 50, "scooter"),
    ("jl 50", 50, "scooter"),
    ("xy 125", 125, "scooter"),
    ("adv 150", 150, "scooter"),
    ("biz 125 es", 125, "scooter"),
    ("biz 110", 110, "scooter"),
    ("biz es", 125, "scooter"),
    ("biz ex", 125, "scooter"),
    ("pop 110", 110, "scooter"),
    ("pop 110i", 110, "scooter"),
    ("pcx 150", 150, "scooter"),
    ("pcx 160", 160, "scooter"),
    ("elite 125", 125, "scooter"),
    ("nmax 160", 160, "scooter"),
    ("xmax 250", 250, "scooter"),
    ("burgman 125", 125, "scooter"),
    ("dafra citycom 300", 300, "scooter"),
    ("citycom", 300, "scooter"),
    // trail / offroad
    ("nxr 150 bros", 150, "trail"),
    ("shi 175", 150, "trail"),
    ("nxr 160", 160, "trail"),
    ("bros 160", 160, "trail"),
    ("nxr 160 bros", 160, "trail"),
    ("xre 190", 190, "trail"),
    ("xre 300", 300, "trail"),
    ("xre 300 sahara", 300, "trail"),
    ("sahara 300", 300, "trail"),
    ("sahara 300 rally", 300, "trail"),
    ("xr 300l tornado", 300, "trail"),
    ("crf 230f", 230, "offroad"),
    ("dr 160", 160, "trail"),
    ("dr 160 s", 160, "trail"),
    ("xtz 150", 150, "trail"),
    ("xtz 250", 250, "trail"),
    ("xtz 250 tenere", 250, "trail"),
    ("tenere 250", 250, "trail"),
    ("lander 250", 250, "trail"),
    ("falcon", 400, "trail"),
    ("dl160", 160, "trail"),
    ("tiger 660", 660, "trail"),
    // bigtrail / adventure
    ("cb 500x", 500, "bigtrail"),
    ("dl 650", 650, "bigtrail"),
    ("dl 650 xt", 650, "bigtrail"),
    ("r 1200 gs", 1200, "bigtrail"),
    ("dl 1000", 1000, "bigtrail"),
    ("pan america 1250", 1250, "bigtrail"),
    ("crf 1100l", 1100, "bigtrail"),
    ("nc 750", 750, "bigtrail"),
    ("g 310", 300, "bigtrail"),
    ("g 310 gs", 300, "bigtrail"),
    ("f 750 gs", 850, "bigtrail"),
    ("f 850 gs", 850, "bigtrail"),
    ("f 900", 900, "bigtrail"),
    ("f 900 gs", 900, "bigtrail"),
    ("r 1250", 1250, "bigtrail"),
    ("r 1250 gs", 1250, "bigtrail"),
    ("r 1300", 1300, "bigtrail"),
    ("r 1300 gs", 1300, "bigtrail"),
    ("g 650 gs", 650, "bigtrail"),
    ("versys 300", 300, "bigtrail"),
    ("versys 650", 650, "bigtrail"),
    ("versys-x 300", 300, "bigtrail"),
    ("tiger 800", 800, "bigtrail"),
    ("tiger 900", 900, "bigtrail"),
    ("tiger 1200", 1200, "bigtrail"),
    ("himalayan", 400, "bigtrail"),
    ("700 x", 700, "bigtrail"),
    // esportiva carenada
    ("gsx-r 1000", 1000, "esportiva carenada"),
    ("s 1000 rr", 1000, "esportiva carenada"),
    ("cbr 250", 250, "esportiva carenada"),
    ("cbr 300", 300, "esportiva carenada"),
    ("cbr 500", 500, "esportiva carenada"),
    ("cbr 600", 600, "esportiva carenada"),
    ("cbr 650", 650, "esportiva carenada"),
    ("cbr 1000", 1000, "esportiva carenada"),
    ("cbr 1000r", 1000, "esportiva carenada"),
    ("yzf r3", 300, "esportiva carenada"),
    ("yzf r-6", 600, "esportiva carenada"),
    ("r15", 150, "esportiva carenada"),
    ("r1", 1000, "esportiva carenada"),
    ("ninja 300", 300, "esportiva carenada"),
    ("ninja 400", 400, "esportiva carenada"),
    ("ninja 650", 650, "esportiva carenada"),
    ("ninja 1000", 1050, "esportiva carenada"),
    ("ninja zx-10r", 1000, "esportiva carenada"),
    ("s 1000", 1000, "esportiva carenada"),
    ("panigale v2", 950, "esportiva carenada"),
    ("panigale v4", 1100, "esportiva carenada"),
    ("hayabusa", 1350, "esportiva carenada"),
    // esportiva naked
    ("z 400", 400, "esportiva naked"),
    ("310 r", 310, "esportiva naked"),
    ("z 1000", 1000, "esportiva naked"),
    ("mt 03", 300, "esportiva naked"),
    ("mt 07", 690, "esportiva naked"),
    ("mt 09", 890, "esportiva naked"),
    ("cb 500", 500, "esportiva naked"),
    ("cb 650", 650, "esportiva naked"),
    ("cb 1000r", 1000, "esportiva naked"),
    ("hornet 600", 600, "esportiva naked"),
    ("cb 600f", 600, "esportiva naked"),
    ("xj6", 600, "esportiva naked"),
    ("z300", 300, "esportiva naked"),
    ("z650", 650, "esportiva naked"),
    ("z750", 750, "esportiva naked"),
    ("z800", 800, "esportiva naked"),
    ("z900", 950, "esportiva naked"),
    ("er-6n", 650, "esportiva naked"),
    ("bandit 600", 600, "esportiva naked"),
    ("bandit 650", 650, "esportiva naked"),
    ("bandit 1250", 1250, "esportiva naked"),
    ("gsx 650f", 650, "esportiva naked"),
    ("gsx-s 750", 750, "esportiva naked"),
    ("gsx-s 1000", 1000, "esportiva naked"),
    ("gixxer 250", 250, "esportiva naked"),
    ("gs500", 500, "esportiva naked"),
    ("monster 797", 800, "esportiva naked"),
    ("monster 821", 820, "esportiva naked"),
    ("monster 937", 940, "esportiva naked"),
    ("street triple", 750, "esportiva naked"),
    ("speed triple", 1050, "esportiva naked"),
    ("trident 660", 660, "esportiva naked"),
    // custom / cruiser
    ("fat boy", 1690, "custom"),
    ("nightster special", 975, "custom"),
    ("iron 883", 883, "custom"),
    ("v-rod", 1250, "custom"),
    ("forty eight", 1200, "custom"),
    ("sportster s", 1250, "custom"),
    ("fat bob", 1140, "custom"),
    ("meteor 350", 350, "custom"),
    ("classic 350", 350, "custom"),
    ("hunter 350", 350, "custom"),
    ("interceptor 650", 650, "custom"),
    ("continental gt 650", 650, "custom"),
    ("diavel 1260", 1260, "custom"),
    ("r 18", 1800, "custom"),
    ("bonneville", 900, "custom"),
    ("mt 01", 1700, "custom"),
    ("meteor supernova", 350, "custom"),
    ("vt 600", 600, "custom"),
    // touring
    ("electra glide ultra", 1700, "touring"),
    ("gold wing 1500", 1500, "touring"),
    ("road glide", 2150, "touring"),
    ("street glide", 1750, "touring"),
    ("k 1300", 1300, "touring"),
    ("k 1600", 1650, "touring"),
    ("xt 660", 660, "touring"),
    ("xt 600", 600, "touring"),
    ("heritage", 1690, "touring"),
    // quads ride the custom bucket
    ("cforce 1000", 1000, "custom"),
    ("trx 420", 420, "custom"),
    ("t350 x", 350, "custom"),
    // oddballs
    ("commander 250", 250, "street"),
    ("gk350", 350, "street"),
];

static TABLE: Lazy<HashMap<String, (u32, &'static str)>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for (model, cc, category) in MOTO_MODELS {
        let key = normalize::loose(model);
        if !key.is_empty() {
            map.insert(key, (*cc, *category));
        }
    }
    let compacts: Vec<(String, (u32, &'static str))> = map
        .iter()
        .filter(|(k, _)| k.contains(' '))
        .map(|(k, v)| (k.replace(' ', ""), *v))
        .collect();
    for (key, value) in compacts {
        map.entry(key).or_insert(value);
    }
    map
});

static SCANNER: Lazy<(AhoCorasick, Vec<String>)> = Lazy::new(|| {
    let patterns: Vec<String> = TABLE.keys().cloned().collect();
    let ac = AhoCorasick::new(&patterns).expect("moto catalog automaton");
    (ac, patterns)
});

/// Infer displacement and category for a motorcycle. Probes the model name,
/// then the trim, then both concatenated — feeds split the code between the
/// two fields unpredictably.
pub fn displacement_and_category(modelo: &str, versao: &str) -> Option<(u32, &'static str)> {
    if let Some(found) = probe(modelo) {
        return Some(found);
    }
    if !versao.is_empty() {
        if let Some(found) = probe(versao) {
            return Some(found);
        }
        return probe(&format!("{modelo} {versao}"));
    }
    None
}

/// Category half of the inference, for model→category degradation.
pub fn category_for(text: &str) -> Option<&'static str> {
    probe(text).map(|(_, category)| category)
}

fn probe(text: &str) -> Option<(u32, &'static str)> {
    let text_norm = normalize::loose(text);
    if text_norm.is_empty() {
        return None;
    }
    if let Some(value) = TABLE.get(&text_norm) {
        return Some(*value);
    }

    // containment scan, most specific fragment wins
    let (ac, patterns) = &*SCANNER;
    ac.find_overlapping_iter(&text_norm)
        .map(|m| patterns[m.pattern().as_usize()].as_str())
        .max_by_key(|key| key.len())
        .map(|key| TABLE[key])
}
