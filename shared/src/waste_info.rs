//! Static recycling knowledge base.
//!
//! Classifier labels are mapped to a [`WasteInfo`] record by walking an ordered list of
//! entries and returning the first whose key and the normalized label contain one another.
//! Order is therefore part of the table's meaning: the built-in table is sorted longest
//! key first so that `"botella de vidrio"` is consulted before `"botella"`.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr,
)]
pub enum WasteCategory {
    #[serde(rename = "reciclable")]
    #[strum(serialize = "reciclable")]
    Reciclable,
    #[serde(rename = "organico")]
    #[strum(serialize = "organico")]
    Organico,
    #[serde(rename = "merma")]
    #[strum(serialize = "merma")]
    Merma,
    #[serde(rename = "no-reciclable")]
    #[strum(serialize = "no-reciclable")]
    NoReciclable,
    #[serde(rename = "info")]
    #[strum(serialize = "info")]
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteInfo {
    #[serde(rename = "type")]
    pub category: WasteCategory,
    pub title: String,
    pub description: String,
    pub instructions: Vec<String>,
    pub tips: Vec<String>,
}

impl WasteInfo {
    pub fn new(
        category: WasteCategory,
        title: &str,
        description: &str,
        instructions: &[&str],
        tips: &[&str],
    ) -> Self {
        Self {
            category,
            title: title.to_string(),
            description: description.to_string(),
            instructions: instructions.iter().map(|s| s.to_string()).collect(),
            tips: tips.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Record returned when no table key matches the label.
    pub fn unknown() -> &'static WasteInfo {
        &UNKNOWN_OBJECT
    }

    /// Record returned when there is no label to resolve (low-confidence predictions).
    pub fn general_guide() -> &'static WasteInfo {
        &GENERAL_GUIDE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteEntry {
    pub key: String,
    pub info: WasteInfo,
}

impl WasteEntry {
    pub fn new(key: &str, info: WasteInfo) -> Self {
        Self {
            key: key.to_lowercase(),
            info,
        }
    }

    /// Bidirectional substring containment against an already-normalized label.
    pub fn matches(&self, normalized_label: &str) -> bool {
        normalized_label.contains(self.key.as_str()) || self.key.contains(normalized_label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteTable {
    entries: Vec<WasteEntry>,
}

impl WasteTable {
    /// Builds a table that is consulted in exactly the given order.
    pub fn new(entries: Vec<WasteEntry>) -> Self {
        Self { entries }
    }

    /// Builds a table sorted by key length, longest first. Keys of equal length keep
    /// their relative order.
    pub fn longest_first(mut entries: Vec<WasteEntry>) -> Self {
        entries.sort_by(|a, b| b.key.chars().count().cmp(&a.key.chars().count()));
        Self { entries }
    }

    pub fn builtin() -> &'static WasteTable {
        &BUILTIN_TABLE
    }

    pub fn entries(&self) -> &[WasteEntry] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the entry a label resolves to, if any.
    pub fn lookup(&self, label: &str) -> Option<&WasteEntry> {
        let normalized = normalize_label(label);
        self.entries.iter().find(|entry| entry.matches(&normalized))
    }

    /// Always returns a record. `None` yields the general guide, an unmatched label
    /// yields the unknown-object record.
    ///
    /// The empty label matches the first entry, since every key contains it.
    pub fn resolve(&self, label: Option<&str>) -> &WasteInfo {
        match label {
            None => WasteInfo::general_guide(),
            Some(label) => self
                .lookup(label)
                .map(|entry| &entry.info)
                .unwrap_or(WasteInfo::unknown()),
        }
    }
}

impl Default for WasteTable {
    fn default() -> Self {
        BUILTIN_TABLE.clone()
    }
}

pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

lazy_static! {
    static ref UNKNOWN_OBJECT: WasteInfo = WasteInfo::new(
        WasteCategory::NoReciclable,
        "Objeto no identificado",
        "No pudimos asociar este objeto con una categoría de reciclaje conocida.",
        &[
            "Consulta con el servicio de recolección de residuos de tu localidad.",
            "Si tienes dudas, deposítalo en el contenedor de residuos generales.",
        ],
        &[
            "Considera si el objeto puede reutilizarse antes de desecharlo.",
            "Toma una foto más clara, con buena luz y el objeto centrado.",
        ],
    );
    static ref GENERAL_GUIDE: WasteInfo = WasteInfo::new(
        WasteCategory::Info,
        "Guía general de separación",
        "La clasificación no es lo bastante confiable para dar una instrucción específica.",
        &[
            "Separa los residuos orgánicos de los reciclables.",
            "Enjuaga y seca envases antes de reciclarlos.",
            "Aplana cajas y botellas para ahorrar espacio.",
        ],
        &[
            "Acerca el objeto a la cámara y evita fondos con otros objetos.",
            "Intenta de nuevo con mejor iluminación.",
        ],
    );
    static ref BUILTIN_TABLE: WasteTable = WasteTable::longest_first(builtin_entries());
}

fn builtin_entries() -> Vec<WasteEntry> {
    use WasteCategory::*;
    vec![
        WasteEntry::new(
            "botella de vidrio",
            WasteInfo::new(
                Reciclable,
                "Botella de vidrio",
                "El vidrio se recicla indefinidamente sin perder calidad.",
                &[
                    "Retira tapas y corchos.",
                    "Enjuaga la botella.",
                    "Deposítala en el contenedor verde de vidrio.",
                ],
                &["No mezcles vidrio con cerámica, espejos ni focos."],
            ),
        ),
        WasteEntry::new(
            "botella de plastico",
            WasteInfo::new(
                Reciclable,
                "Botella de plástico",
                "Las botellas PET son uno de los plásticos más reciclados.",
                &[
                    "Vacía y enjuaga la botella.",
                    "Aplástala para reducir volumen.",
                    "Deposítala en el contenedor amarillo de envases.",
                ],
                &["Deja la tapa puesta si tu servicio local lo indica."],
            ),
        ),
        WasteEntry::new(
            "botella",
            WasteInfo::new(
                Reciclable,
                "Botella",
                "Las botellas son envases reciclables según su material.",
                &[
                    "Identifica el material: vidrio o plástico.",
                    "Vacía y enjuaga la botella.",
                    "Deposítala en el contenedor correspondiente.",
                ],
                &["Reutiliza las botellas resistentes para almacenar líquidos."],
            ),
        ),
        WasteEntry::new(
            "lata",
            WasteInfo::new(
                Reciclable,
                "Lata de aluminio",
                "El aluminio se recicla con un ahorro de energía de hasta el 95%.",
                &[
                    "Vacía la lata por completo.",
                    "Enjuágala y aplástala.",
                    "Deposítala en el contenedor de envases.",
                ],
                &["Las anillas también son de aluminio: no las separes."],
            ),
        ),
        WasteEntry::new(
            "carton",
            WasteInfo::new(
                Reciclable,
                "Cartón",
                "El cartón limpio y seco se convierte en nuevo papel.",
                &[
                    "Retira cintas y restos de comida.",
                    "Aplana las cajas.",
                    "Deposítalo en el contenedor azul.",
                ],
                &["El cartón con grasa, como el de pizza, va con los orgánicos."],
            ),
        ),
        WasteEntry::new(
            "papel",
            WasteInfo::new(
                Reciclable,
                "Papel",
                "El papel puede reciclarse varias veces.",
                &["Mantenlo seco y limpio.", "Deposítalo en el contenedor azul."],
                &["El papel higiénico y las servilletas usadas no se reciclan."],
            ),
        ),
        WasteEntry::new(
            "plastico",
            WasteInfo::new(
                Reciclable,
                "Envase de plástico",
                "Muchos envases plásticos son reciclables si están limpios.",
                &[
                    "Revisa el símbolo de reciclaje del envase.",
                    "Enjuágalo.",
                    "Deposítalo en el contenedor amarillo.",
                ],
                &["Evita los plásticos de un solo uso siempre que puedas."],
            ),
        ),
        WasteEntry::new(
            "vidrio",
            WasteInfo::new(
                Reciclable,
                "Vidrio",
                "Frascos y envases de vidrio se reciclan en el contenedor verde.",
                &["Retira las tapas metálicas.", "Deposítalo en el contenedor verde."],
                &["Los vidrios rotos deben envolverse antes de desecharse."],
            ),
        ),
        WasteEntry::new(
            "no reciclable",
            WasteInfo::new(
                NoReciclable,
                "Residuo no reciclable",
                "Este residuo no puede recuperarse con los sistemas de reciclaje habituales.",
                &["Deposítalo en el contenedor de residuos generales."],
                &["Busca alternativas reutilizables para este tipo de producto."],
            ),
        ),
        WasteEntry::new(
            "reciclable",
            WasteInfo::new(
                Reciclable,
                "Residuo reciclable",
                "Este residuo puede reciclarse si se separa correctamente.",
                &[
                    "Límpialo de restos de comida.",
                    "Deposítalo en el contenedor de reciclaje que corresponda.",
                ],
                &["Separar en casa facilita el trabajo de las plantas de reciclaje."],
            ),
        ),
        WasteEntry::new(
            "organico",
            WasteInfo::new(
                Organico,
                "Residuo orgánico",
                "Los restos de comida y jardín pueden convertirse en compost.",
                &[
                    "Deposítalo en el contenedor marrón de orgánicos.",
                    "No incluyas bolsas plásticas.",
                ],
                &["Haz compost en casa para obtener abono para tus plantas."],
            ),
        ),
        WasteEntry::new(
            "merma",
            WasteInfo::new(
                Merma,
                "Merma",
                "Productos dañados o vencidos que ya no pueden venderse ni consumirse.",
                &[
                    "Separa el envase del contenido.",
                    "El contenido orgánico va al contenedor marrón.",
                    "El envase limpio va al contenedor de reciclaje.",
                ],
                &["Planifica tus compras para reducir la merma."],
            ),
        ),
        WasteEntry::new(
            "pila",
            WasteInfo::new(
                NoReciclable,
                "Pila o batería",
                "Las pilas contienen metales pesados contaminantes.",
                &[
                    "Nunca las tires a la basura común.",
                    "Llévalas a un punto de recolección de pilas.",
                ],
                &["Usa pilas recargables para reducir residuos."],
            ),
        ),
        WasteEntry::new(
            "electronico",
            WasteInfo::new(
                NoReciclable,
                "Residuo electrónico",
                "Los aparatos electrónicos requieren un tratamiento especial.",
                &["Llévalo a un punto limpio o centro de acopio de electrónicos."],
                &["Dona los aparatos que todavía funcionen."],
            ),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(category: WasteCategory, title: &str) -> WasteInfo {
        WasteInfo::new(category, title, "", &[], &[])
    }

    #[test]
    fn multi_word_key_wins_when_listed_first() {
        let table = WasteTable::new(vec![
            WasteEntry::new("botella de vidrio", info(WasteCategory::Reciclable, "vidrio")),
            WasteEntry::new("botella", info(WasteCategory::Reciclable, "generica")),
        ]);

        let resolved = table.resolve(Some("Botella de vidrio (class 3)"));
        assert_eq!(resolved.title, "vidrio");
    }

    #[test]
    fn shorter_key_wins_when_listed_first() {
        let table = WasteTable::new(vec![
            WasteEntry::new("botella", info(WasteCategory::Reciclable, "generica")),
            WasteEntry::new("botella de vidrio", info(WasteCategory::Reciclable, "vidrio")),
        ]);

        let resolved = table.resolve(Some("Botella de vidrio (class 3)"));
        assert_eq!(resolved.title, "generica");
    }

    #[test]
    fn longest_first_reorders_keys() {
        let table = WasteTable::longest_first(vec![
            WasteEntry::new("botella", info(WasteCategory::Reciclable, "generica")),
            WasteEntry::new("lata", info(WasteCategory::Reciclable, "lata")),
            WasteEntry::new("botella de vidrio", info(WasteCategory::Reciclable, "vidrio")),
        ]);

        let keys: Vec<&str> = table.keys().collect();
        assert_eq!(keys, vec!["botella de vidrio", "botella", "lata"]);
        assert_eq!(table.resolve(Some("botella de vidrio")).title, "vidrio");
    }

    #[test]
    fn key_contained_in_label_and_label_in_key_both_match() {
        let table = WasteTable::builtin();
        assert_eq!(table.resolve(Some("  LATA de refresco ")).title, "Lata de aluminio");
        // "botel" is contained in several keys; the longest one comes first.
        assert_eq!(table.resolve(Some("botel")).title, "Botella de plástico");
    }

    #[test]
    fn unmatched_label_falls_back_to_unknown() {
        let resolved = WasteTable::builtin().resolve(Some("zapato"));
        assert_eq!(resolved.category, WasteCategory::NoReciclable);
        assert_eq!(resolved, WasteInfo::unknown());
        assert!(!resolved.instructions.is_empty());
        assert!(!resolved.tips.is_empty());
    }

    #[test]
    fn missing_label_returns_general_guide() {
        let resolved = WasteTable::builtin().resolve(None);
        assert_eq!(resolved.category, WasteCategory::Info);
    }

    #[test]
    fn empty_label_matches_first_entry() {
        let table = WasteTable::builtin();
        let first = &table.entries()[0];
        assert_eq!(table.resolve(Some("")), &first.info);
        assert_eq!(table.resolve(Some("   ")), &first.info);
    }

    #[test]
    fn negated_label_is_not_taken_for_recyclable() {
        let resolved = WasteTable::builtin().resolve(Some("No reciclable"));
        assert_eq!(resolved.category, WasteCategory::NoReciclable);
    }

    #[test]
    fn category_serializes_with_lowercase_names() {
        let json = serde_json::to_string(&WasteCategory::NoReciclable).unwrap();
        assert_eq!(json, "\"no-reciclable\"");
        assert_eq!(WasteCategory::Organico.to_string(), "organico");
        assert_eq!("merma".parse::<WasteCategory>().unwrap(), WasteCategory::Merma);
    }
}
