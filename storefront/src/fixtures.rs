//! Demo catalog: one event, its venue sections, ranked seat options and the
//! merchandise line-up. Prices are integer cents.

use crate::types::{
    EventId, EventInfo, MerchItem, Money, SeatOption, Section, SectionId, User, UserId,
};
use chrono::{TimeZone, Utc};

/// The event everything in the demo catalog belongs to
#[must_use]
#[allow(clippy::expect_used)] // literal date is valid
pub fn event() -> EventInfo {
    EventInfo {
        id: EventId::from("evento-1"),
        name: "Gran Arena Monticello".into(),
        date: Utc
            .with_ymd_and_hms(2025, 12, 15, 20, 0, 0)
            .single()
            .expect("valid fixture date"),
        venue: "Arena Monticello".into(),
    }
}

/// The user the demo signs in as
#[must_use]
pub fn demo_user() -> User {
    User {
        id: UserId::from("user-123"),
        name: "Usuario Demo".into(),
        phone: "+56912345678".into(),
    }
}

/// Ranked seat options the advisor draws from
#[must_use]
pub fn seat_options() -> Vec<SeatOption> {
    let rows: [(&str, &str, u8, &str, u64); 5] = [
        (
            "primeras-filas",
            "Primeras Filas",
            95,
            "Vista perfecta del escenario, cerca de la acción, excelente acústica",
            17_250_000,
        ),
        (
            "platinum",
            "Platinum",
            92,
            "Vista frontal premium, asientos cómodos, buen balance precio-calidad",
            12_650_000,
        ),
        (
            "black",
            "Black",
            88,
            "Excelente vista lateral, buen precio, asientos espaciosos",
            10_350_000,
        ),
        (
            "platea-joker-bajo",
            "Platea Joker Bajo",
            85,
            "Buena vista frontal, precio accesible, cerca de servicios",
            10_235_000,
        ),
        (
            "platea-corazon-bajo",
            "Platea Corazón Bajo",
            85,
            "Excelente ubicación central, vista equilibrada del escenario",
            10_235_000,
        ),
    ];
    rows.into_iter()
        .map(|(id, name, score, reason, cents)| SeatOption {
            section_id: SectionId::from(id),
            section_name: name.into(),
            score,
            reason: reason.into(),
            price: Money::from_cents(cents),
        })
        .collect()
}

/// Merchandise catalog
#[must_use]
pub fn merch_items() -> Vec<MerchItem> {
    let rows: [(u32, &str, u64, &[&str], &str); 6] = [
        (
            1,
            "Polera Oficial del Evento",
            2_500_000,
            &["ropa", "popular"],
            "Polera 100% algodón con diseño exclusivo",
        ),
        (
            2,
            "Gorra Edición Limitada",
            1_800_000,
            &["ropa", "limitado"],
            "Gorra ajustable con bordado premium",
        ),
        (
            3,
            "Poster del Concierto",
            1_200_000,
            &["coleccionable"],
            "Poster oficial tamaño A2, papel de alta calidad",
        ),
        (
            4,
            "Taza Conmemorativa",
            900_000,
            &["accesorio", "popular"],
            "Taza cerámica con diseño exclusivo",
        ),
        (
            5,
            "Llavero Premium",
            600_000,
            &["accesorio"],
            "Llavero metálico con acabado de lujo",
        ),
        (
            6,
            "Hoodie Oficial",
            3_500_000,
            &["ropa", "premium"],
            "Hoodie unisex con capucha y bolsillos",
        ),
    ];
    rows.into_iter()
        .map(|(id, name, cents, tags, description)| MerchItem {
            id,
            name: name.into(),
            price: Money::from_cents(cents),
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
            description: description.into(),
        })
        .collect()
}

/// All venue sections with pricing and remaining inventory
#[must_use]
pub fn sections() -> Vec<Section> {
    let rows: [(&str, &str, u64, u32); 18] = [
        ("primeras-filas", "Primeras Filas", 17_250_000, 45),
        ("platinum", "Platinum", 12_650_000, 120),
        ("black", "Black", 10_350_000, 85),
        ("platea-joker-bajo", "Platea Joker Bajo", 10_235_000, 200),
        ("platea-corazon-bajo", "Platea Corazón Bajo", 10_235_000, 180),
        ("platea-diamante-bajo", "Platea Diamante Bajo", 10_235_000, 190),
        ("platea-pica-bajo-vp", "Platea Pica Bajo V/P", 10_235_000, 95),
        ("platea-trebol-bajo-vp", "Platea Trébol Bajo V/P", 10_235_000, 100),
        ("platea-pica-bajo", "Platea Pica Bajo", 10_235_000, 210),
        ("platea-trebol-bajo", "Platea Trébol Bajo", 10_235_000, 205),
        ("platea-joker-alto", "Platea Joker Alto", 7_475_000, 250),
        ("platea-diamante-alta", "Platea Diamante Alta", 7_475_000, 240),
        ("platea-corazon-alta", "Platea Corazón Alta", 7_475_000, 230),
        ("platea-pica-alto", "Platea Pica Alto", 7_475_000, 260),
        ("platea-trebol-alto", "Platea Trébol Alto", 7_475_000, 255),
        ("platea-pica-alto-vp", "Platea Pica Alto V/P", 4_485_000, 320),
        ("platea-trebol-alto-vp", "Platea Trébol Alto V/P", 4_485_000, 310),
        ("silla-ruedas", "Silla de Ruedas", 10_235_000, 12),
    ];
    rows.into_iter()
        .map(|(id, name, cents, available_seats)| Section {
            id: SectionId::from(id),
            name: name.into(),
            price: Money::from_cents(cents),
            available_seats,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::panic)] // Test code: names the missing section
    fn seat_options_match_their_sections() {
        let sections = sections();
        for option in seat_options() {
            let section = sections
                .iter()
                .find(|s| s.id == option.section_id)
                .unwrap_or_else(|| panic!("missing section {}", option.section_id));
            assert_eq!(section.price, option.price);
        }
    }

    #[test]
    fn catalog_sizes() {
        assert_eq!(seat_options().len(), 5);
        assert_eq!(merch_items().len(), 6);
        assert_eq!(sections().len(), 18);
    }

    #[test]
    fn seat_options_rank_from_best() {
        let options = seat_options();
        assert!(options.windows(2).all(|w| w[0].score >= w[1].score));
    }
}
