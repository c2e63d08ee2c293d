//! Car model → body-category lookup
//!
//! Model-name fragments collected from dealer feeds, keyed loose-normalized.
//! A handful of models ship as hatch or sedan depending on trim; those carry
//! the `HatchOrSedan` hint and are resolved by an option keyword instead of
//! a sentinel category string.

use crate::search::normalize;
use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Option keyword whose presence marks an ambiguous hatch/sedan model as
/// Hatch (rear wipers only exist on hatches in these feeds).
pub const HATCH_OPTION_KEYWORD: &str = "limpador traseiro";

/// Category assignment for a model fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryHint {
    Fixed(&'static str),
    /// Same badge sold as hatch and sedan; resolved via the options text.
    HatchOrSedan,
}

const HATCH_MODELS: &[&str] = &[
    "500", "QQ", "308", "IX35", "A 200", "joy", "gol", "uno", "palio", "celta", "march",
    "sandero", "i30", "golf", "fox", "up", "fit", "etios", "bravo", "punto", "208", "argo",
    "mobi", "c3", "picanto", "stilo", "c4 vtr", "kwid", "soul", "agile", "fusca", "a1",
    "new beetle", "116i", "118i", "120i", "125i", "m135i", "m140i",
];

const SEDAN_MODELS: &[&str] = &[
    "arrizo 6", "A5", "430i", "civic", "a6", "sentra", "jetta", "voyage", "siena",
    "grand siena", "cobalt", "logan", "fluence", "cerato", "elantra", "virtus", "accord",
    "altima", "fusion", "passat", "vectra sedan", "classic", "cronos", "linea", "408",
    "c4 pallas", "bora", "hb20s", "lancer", "camry", "onix plus", "azera", "malibu", "318i",
    "320d", "320i", "328i", "330d", "330i", "335i", "520d", "528i", "530d", "530i", "535i",
    "540i", "550i", "740i", "750i", "c180", "c200", "c250", "c300", "e250", "e350", "m3",
    "m5", "s4", "classe c", "classe e", "classe s", "eqe", "eqs",
];

const HATCH_SEDAN_MODELS: &[&str] = &[
    "320iA", "onix", "hb20", "yaris", "city", "a3", "corolla", "focus", "fiesta", "corsa",
    "astra", "vectra", "cruze", "clio", "megane", "206", "207", "307", "tiida", "ka",
    "versa", "prisma", "polo", "c4", "sonic", "série 1", "série 2", "série 3", "série 4",
    "série 5", "série 6", "série 7", "classe a", "cla",
];

const SUV_MODELS: &[&str] = &[
    "range rover sport", "glk 220", "disc spt", "veracruz", "captiva", "discovery", "macan",
    "journey", "xc90", "xc60", "tiggo", "edge", "outlander", "range rover evoque",
    "song plus", "duster", "ecosport", "hrv", "hr-v", "compass", "renegade", "tracker",
    "kicks", "captur", "creta", "tucson", "santa fe", "sorento", "sportage", "pajero",
    "tr4", "aircross", "tiguan", "t-cross", "rav4", "land cruiser", "cherokee",
    "grand cherokee", "trailblazer", "pulse", "fastback", "territory", "bronco sport",
    "2008", "3008", "5008", "c4 cactus", "taos", "crv", "cr-v", "corolla cross",
    "hilux sw4", "sw4", "pajero sport", "commander", "nivus", "equinox", "x1", "x2", "x3",
    "x4", "x5", "x6", "x7", "ix", "ix1", "ix2", "ix3", "gla", "glb", "glc", "gle", "gls",
    "classe g", "eqa", "eqb", "eqc", "q2", "q3", "q5", "q7", "q8", "q6 e-tron", "e-tron",
    "q4 e-tron", "wrx", "xv",
];

const CAMINHONETE_MODELS: &[&str] = &[
    "f-350", "s-10 pick-up", "silverado", "f-1000", "duster oroch", "d20", "hilux",
    "ranger", "s10", "s-10", "l200 triton", "l200", "triton", "toro", "frontier", "amarok",
    "maverick", "ram 1500", "rampage", "f-250", "courier", "dakota", "gladiator", "hoggar",
];

const UTILITARIO_MODELS: &[&str] = &[
    "bongo", "montana", "saveiro", "strada", "oroch", "kangoo", "partner", "doblo",
    "fiorino", "kombi", "doblo cargo", "berlingo", "combo", "express", "hr",
];

const FURGAO_MODELS: &[&str] = &[
    "boxer", "daily", "ducato", "expert", "jumper", "jumpy", "master", "scudo", "sprinter",
    "trafic", "transit", "vito",
];

const COUPE_MODELS: &[&str] = &[
    "911", "718", "370z", "brz", "camaro", "challenger", "corvette", "gt86", "mustang",
    "r8", "rcz", "rx8", "supra", "tt", "tts", "veloster", "m2", "m4", "m8", "s5", "amg gt",
];

const CONVERSIVEL_MODELS: &[&str] = &[
    "911 cabrio", "beetle cabriolet", "boxster", "eos", "miata", "mini cabrio", "slk", "z4",
    "série 8", "slc", "sl",
];

const STATION_WAGON_MODELS: &[&str] = &[
    "a4 avant", "fielder", "golf variant", "palio weekend", "parati", "quantum", "spacefox",
    "rs2", "rs4", "rs6",
];

const MINIVAN_MODELS: &[&str] = &[
    "caravan", "carnival", "grand c4", "idea", "livina", "meriva", "picasso", "scenic",
    "sharan", "spin", "touran", "xsara picasso", "zafira", "série 2 active tourer",
    "classe b", "classe t", "classe r", "classe v",
];

const OFFROAD_MODELS: &[&str] = &[
    "t4", "bandeirante", "bronco", "defender", "grand vitara", "jimny", "samurai",
    "troller", "wrangler",
];

const GROUPS: &[(&[&str], CategoryHint)] = &[
    (HATCH_MODELS, CategoryHint::Fixed("Hatch")),
    (SEDAN_MODELS, CategoryHint::Fixed("Sedan")),
    (HATCH_SEDAN_MODELS, CategoryHint::HatchOrSedan),
    (SUV_MODELS, CategoryHint::Fixed("SUV")),
    (CAMINHONETE_MODELS, CategoryHint::Fixed("Caminhonete")),
    (UTILITARIO_MODELS, CategoryHint::Fixed("Utilitário")),
    (FURGAO_MODELS, CategoryHint::Fixed("Furgão")),
    (COUPE_MODELS, CategoryHint::Fixed("Coupe")),
    (CONVERSIVEL_MODELS, CategoryHint::Fixed("Conversível")),
    (STATION_WAGON_MODELS, CategoryHint::Fixed("Station Wagon")),
    (MINIVAN_MODELS, CategoryHint::Fixed("Minivan")),
    (OFFROAD_MODELS, CategoryHint::Fixed("Off-road")),
];

/// Keys loose-normalized; space-stripped variants are added afterwards so
/// "a200" resolves like "a 200" without duplicating table entries.
static TABLE: Lazy<HashMap<String, CategoryHint>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for (models, hint) in GROUPS {
        for model in *models {
            let key = normalize::loose(model);
            if !key.is_empty() {
                map.insert(key, *hint);
            }
        }
    }
    let compacts: Vec<(String, CategoryHint)> = map
        .iter()
        .filter(|(k, _)| k.contains(' '))
        .map(|(k, v)| (k.replace(' ', ""), *v))
        .collect();
    for (key, hint) in compacts {
        map.entry(key).or_insert(hint);
    }
    map
});

static SCANNER: Lazy<(AhoCorasick, Vec<String>)> = Lazy::new(|| {
    let patterns: Vec<String> = TABLE.keys().cloned().collect();
    let ac = AhoCorasick::new(&patterns).expect("car catalog automaton");
    (ac, patterns)
});

/// Resolve the body category of a car model, consulting the options text for
/// hatch/sedan-ambiguous badges. Exact key lookup first, then a containment
/// scan where the most specific (longest) fragment wins; any ambiguous
/// fragment takes precedence over fixed ones.
pub fn category_for(modelo: &str, opcionais: &str) -> Option<String> {
    let model_norm = normalize::loose(modelo);
    if model_norm.is_empty() {
        return None;
    }

    if let Some(hint) = TABLE.get(&model_norm) {
        return Some(resolve(*hint, opcionais));
    }

    let mut candidates: HashMap<&str, CategoryHint> = HashMap::new();

    let (ac, patterns) = &*SCANNER;
    for m in ac.find_overlapping_iter(&model_norm) {
        let key = patterns[m.pattern().as_usize()].as_str();
        candidates.insert(key, TABLE[key]);
    }

    // a multi-word fragment also counts when all of its words appear as
    // whole words of the model, regardless of order
    let model_words: HashSet<&str> = model_norm.split(' ').collect();
    for (key, hint) in TABLE.iter() {
        if key.split(' ').all(|w| model_words.contains(w)) {
            candidates.insert(key.as_str(), *hint);
        }
    }

    if candidates
        .values()
        .any(|h| *h == CategoryHint::HatchOrSedan)
    {
        return Some(resolve(CategoryHint::HatchOrSedan, opcionais));
    }

    candidates
        .into_iter()
        .max_by_key(|(key, _)| key.len())
        .map(|(_, hint)| resolve(hint, opcionais))
}

/// Exact-key lookup only, no containment scan.
pub fn exact_category_for(modelo: &str, opcionais: &str) -> Option<String> {
    TABLE
        .get(&normalize::loose(modelo))
        .map(|hint| resolve(*hint, opcionais))
}

fn resolve(hint: CategoryHint, opcionais: &str) -> String {
    match hint {
        CategoryHint::Fixed(category) => category.to_string(),
        CategoryHint::HatchOrSedan => {
            let keyword = normalize::loose(HATCH_OPTION_KEYWORD);
            if normalize::loose(opcionais).contains(&keyword) {
                "Hatch".to_string()
            } else {
                "Sedan".to_string()
            }
        }
    }
}
