use core::str::FromStr;

use serde::{Deserialize, Serialize};

use flipstock_core::{DomainError, DomainResult};
use flipstock_inventory::{Item, Symbology};

/// Pick a symbology that fits a barcode value.
///
/// Numeric retail lengths get their native symbology; everything else falls
/// back to Code-128, which carries arbitrary alphanumerics.
pub fn select_symbology(value: &str) -> Symbology {
    if value.chars().all(|c| c.is_ascii_digit()) {
        match value.len() {
            8 => return Symbology::Ean8,
            12 => return Symbology::UpcA,
            13 => return Symbology::Ean13,
            _ => {}
        }
    }
    Symbology::Code128
}

/// Common label stock the sheet can be laid out for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetPreset {
    Avery5160,
    Avery5167,
    #[serde(rename = "2x1")]
    TwoByOne,
    #[serde(rename = "1.5x1")]
    OnePointFiveByOne,
}

/// Physical label dimensions in inches.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct LabelDimensions {
    pub label_width: f64,
    pub label_height: f64,
    pub gap: f64,
    pub margin: f64,
}

impl SheetPreset {
    pub fn dimensions(&self) -> LabelDimensions {
        match self {
            SheetPreset::Avery5160 => LabelDimensions {
                label_width: 2.625,
                label_height: 1.0,
                gap: 0.125,
                margin: 0.5,
            },
            SheetPreset::Avery5167 => LabelDimensions {
                label_width: 1.75,
                label_height: 0.5,
                gap: 0.125,
                margin: 0.5,
            },
            SheetPreset::TwoByOne => LabelDimensions {
                label_width: 2.0,
                label_height: 1.0,
                gap: 0.125,
                margin: 0.5,
            },
            SheetPreset::OnePointFiveByOne => LabelDimensions {
                label_width: 1.5,
                label_height: 1.0,
                gap: 0.125,
                margin: 0.5,
            },
        }
    }
}

impl FromStr for SheetPreset {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "avery5160" => Ok(SheetPreset::Avery5160),
            "avery5167" => Ok(SheetPreset::Avery5167),
            "2x1" => Ok(SheetPreset::TwoByOne),
            "1.5x1" => Ok(SheetPreset::OnePointFiveByOne),
            _ => Err(DomainError::validation(format!("unknown sheet preset: {s:?}"))),
        }
    }
}

/// Sheet layout options, clamped to sane print ranges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetOptions {
    copies: u32,
    cols: u32,
    show_text: bool,
    preset: Option<SheetPreset>,
}

impl SheetOptions {
    /// Copies clamp to 1..=100, columns to 1..=6 (3 fits Avery 5160).
    pub fn new(copies: u32, cols: u32, show_text: bool, preset: Option<SheetPreset>) -> Self {
        Self {
            copies: copies.clamp(1, 100),
            cols: cols.clamp(1, 6),
            show_text,
            preset,
        }
    }

    pub fn copies(&self) -> u32 {
        self.copies
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self::new(1, 3, true, None)
    }
}

/// One label cell on the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Label {
    pub title: String,
    pub value: String,
    pub symbology: Symbology,
}

/// A planned sheet, ready for a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelSheet {
    pub cols: u32,
    pub show_text: bool,
    pub dimensions: Option<LabelDimensions>,
    pub labels: Vec<Label>,
}

/// Plan a label sheet for `items`.
///
/// Items without a barcode are labeled with their item id so the sticker
/// still scans back to something unique. Copies of the same item are laid
/// out adjacently, in input order.
pub fn plan_sheet(items: &[Item], options: &SheetOptions) -> DomainResult<LabelSheet> {
    if items.is_empty() {
        return Err(DomainError::validation("no items selected for labels"));
    }

    let mut labels = Vec::with_capacity(items.len() * options.copies as usize);
    for item in items {
        let value = match &item.barcode {
            Some(barcode) => barcode.as_str().to_string(),
            None => item.id.to_string(),
        };
        let label = Label {
            title: item.title.clone(),
            symbology: select_symbology(&value),
            value,
        };
        for _ in 0..options.copies {
            labels.push(label.clone());
        }
    }

    Ok(LabelSheet {
        cols: options.cols,
        show_text: options.show_text,
        dimensions: options.preset.map(|p| p.dimensions()),
        labels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use flipstock_core::UserId;
    use flipstock_inventory::{Barcode, NewItem};

    fn item_with_barcode(title: &str, barcode: &str) -> Item {
        let new = NewItem {
            title: title.into(),
            barcode: Some(Barcode::parse(barcode).unwrap()),
            ..NewItem::default()
        };
        Item::create(UserId::new(), new, Utc::now()).unwrap()
    }

    #[test]
    fn symbology_follows_numeric_length() {
        assert_eq!(select_symbology("01234567"), Symbology::Ean8);
        assert_eq!(select_symbology("012345678905"), Symbology::UpcA);
        assert_eq!(select_symbology("4002971024692"), Symbology::Ean13);
        assert_eq!(select_symbology("0123456789"), Symbology::Code128);
        assert_eq!(select_symbology("AB123"), Symbology::Code128);
    }

    #[test]
    fn options_clamp_copies_and_cols() {
        let opts = SheetOptions::new(0, 0, true, None);
        assert_eq!(opts.copies(), 1);
        assert_eq!(opts.cols(), 1);

        let opts = SheetOptions::new(1000, 50, true, None);
        assert_eq!(opts.copies(), 100);
        assert_eq!(opts.cols(), 6);
    }

    #[test]
    fn copies_are_adjacent_and_in_input_order() {
        let items = [
            item_with_barcode("Denim jacket", "012345678905"),
            item_with_barcode("Wool coat", "01234567"),
        ];
        let sheet = plan_sheet(&items, &SheetOptions::new(2, 3, true, None)).unwrap();

        let values: Vec<&str> = sheet.labels.iter().map(|l| l.value.as_str()).collect();
        assert_eq!(
            values,
            ["012345678905", "012345678905", "01234567", "01234567"]
        );
        assert_eq!(sheet.labels[0].symbology, Symbology::UpcA);
        assert_eq!(sheet.labels[2].symbology, Symbology::Ean8);
    }

    #[test]
    fn item_without_barcode_falls_back_to_its_id() {
        let item = Item::create(
            UserId::new(),
            NewItem {
                title: "Mystery box".into(),
                ..NewItem::default()
            },
            Utc::now(),
        )
        .unwrap();

        let sheet = plan_sheet(std::slice::from_ref(&item), &SheetOptions::default()).unwrap();
        assert_eq!(sheet.labels[0].value, item.id.to_string());
        assert_eq!(sheet.labels[0].symbology, Symbology::Code128);
    }

    #[test]
    fn preset_carries_dimensions() {
        let item = item_with_barcode("Denim jacket", "012345678905");
        let sheet = plan_sheet(
            std::slice::from_ref(&item),
            &SheetOptions::new(1, 3, true, Some(SheetPreset::Avery5160)),
        )
        .unwrap();

        let dims = sheet.dimensions.unwrap();
        assert_eq!(dims.label_width, 2.625);
        assert_eq!(dims.label_height, 1.0);
    }

    #[test]
    fn empty_selection_is_rejected() {
        assert!(plan_sheet(&[], &SheetOptions::default()).is_err());
    }
}
