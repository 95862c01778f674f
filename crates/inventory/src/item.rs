use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use flipstock_core::{CategoryId, DomainError, DomainResult, Entity, ItemId, Money, UserId};

use crate::barcode::Barcode;

/// Listing lifecycle, derived from whether a sold price has been recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Listed,
    Sold,
}

/// Fields accepted when creating an item.
///
/// Everything except the title is optional: the scan flow creates items
/// carrying only a barcode, the form flow fills in the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewItem {
    pub title: String,
    pub category_id: Option<CategoryId>,
    pub barcode: Option<Barcode>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub condition: Option<String>,
    pub notes: Option<String>,
    pub purchase_source: Option<String>,
    pub purchase_price: Option<Money>,
    pub purchase_date: Option<NaiveDate>,
    pub list_price: Option<Money>,
    pub sold_price: Option<Money>,
    pub sold_date: Option<NaiveDate>,
}

/// Derived item economics under the marketplace fee schedule.
///
/// Computed on demand, never persisted. `payout`/`profit` stay `None` until
/// the item sells; `break_even_price` stays `None` while the cost is zero
/// (nothing to recover).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemEconomics {
    pub status: ItemStatus,
    pub break_even_price: Option<Money>,
    pub payout: Option<Money>,
    pub profit: Option<Money>,
}

/// One inventory unit owned by a user.
///
/// # Invariants
/// - `title` is non-empty (trimmed).
/// - `purchase_price` is never negative; optional prices, when present, are
///   never negative.
/// - Items are never destroyed by the domain itself; deletion is an explicit
///   repository operation requested by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub user_id: UserId,
    pub category_id: Option<CategoryId>,
    pub title: String,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub condition: Option<String>,
    pub notes: Option<String>,
    pub barcode: Option<Barcode>,
    pub purchase_source: Option<String>,
    pub purchase_price: Money,
    pub purchase_date: Option<NaiveDate>,
    pub list_price: Option<Money>,
    pub photo_path: Option<String>,
    pub sold_price: Option<Money>,
    pub sold_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn ensure_price(label: &str, price: Money) -> DomainResult<()> {
    if price.is_negative() {
        return Err(DomainError::validation(format!(
            "{label} cannot be negative: {price}"
        )));
    }
    Ok(())
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Item {
    /// Create a new item, validating invariants.
    ///
    /// An empty title falls back to `"Untitled"` (the scan flow knows only
    /// the barcode). When no list price is given and the item cost money,
    /// the break-even price is filled in so a freshly created listing never
    /// silently sits below cost.
    pub fn create(user_id: UserId, new: NewItem, now: DateTime<Utc>) -> DomainResult<Self> {
        let title = new.title.trim();
        let title = if title.is_empty() {
            "Untitled".to_string()
        } else {
            title.to_string()
        };

        let purchase_price = new.purchase_price.unwrap_or(Money::ZERO);
        ensure_price("purchase price", purchase_price)?;
        if let Some(p) = new.list_price {
            ensure_price("list price", p)?;
        }
        if let Some(p) = new.sold_price {
            ensure_price("sold price", p)?;
        }

        let list_price = match new.list_price {
            Some(p) => Some(p),
            None => Self::auto_list_price(purchase_price)?,
        };

        Ok(Self {
            id: ItemId::new(),
            user_id,
            category_id: new.category_id,
            title,
            brand: clean(new.brand),
            size: clean(new.size),
            color: clean(new.color),
            condition: clean(new.condition),
            notes: clean(new.notes),
            barcode: new.barcode,
            purchase_source: clean(new.purchase_source),
            purchase_price,
            purchase_date: new.purchase_date,
            list_price,
            photo_path: None,
            sold_price: new.sold_price,
            sold_date: new.sold_date,
            created_at: now,
            updated_at: now,
        })
    }

    fn auto_list_price(purchase_price: Money) -> DomainResult<Option<Money>> {
        if purchase_price <= Money::ZERO {
            return Ok(None);
        }
        flipstock_fees::break_even_price(purchase_price).map(Some)
    }

    pub fn status(&self) -> ItemStatus {
        if self.sold_price.is_some() {
            ItemStatus::Sold
        } else {
            ItemStatus::Listed
        }
    }

    /// Compute the fee-schedule numbers for this item.
    pub fn economics(&self) -> DomainResult<ItemEconomics> {
        let break_even_price = if self.purchase_price > Money::ZERO {
            Some(flipstock_fees::break_even_price(self.purchase_price)?)
        } else {
            None
        };

        let (payout, profit) = match self.sold_price {
            Some(sold) => (
                Some(flipstock_fees::payout_after_fees(sold)?),
                Some(flipstock_fees::profit(self.purchase_price, sold)?),
            ),
            None => (None, None),
        };

        Ok(ItemEconomics {
            status: self.status(),
            break_even_price,
            payout,
            profit,
        })
    }

    pub fn rename(&mut self, title: &str, now: DateTime<Utc>) -> DomainResult<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(DomainError::validation("title cannot be empty"));
        }
        self.title = title.to_string();
        self.touch(now);
        Ok(())
    }

    pub fn set_category(&mut self, category_id: Option<CategoryId>, now: DateTime<Utc>) {
        self.category_id = category_id;
        self.touch(now);
    }

    /// Replace the barcode. Per-user uniqueness is enforced by the repository.
    pub fn set_barcode(&mut self, barcode: Option<Barcode>, now: DateTime<Utc>) {
        self.barcode = barcode;
        self.touch(now);
    }

    pub fn set_purchase_price(&mut self, price: Money, now: DateTime<Utc>) -> DomainResult<()> {
        ensure_price("purchase price", price)?;
        self.purchase_price = price;
        self.touch(now);
        Ok(())
    }

    pub fn set_purchase_date(&mut self, date: Option<NaiveDate>, now: DateTime<Utc>) {
        self.purchase_date = date;
        self.touch(now);
    }

    pub fn set_purchase_source(&mut self, source: Option<String>, now: DateTime<Utc>) {
        self.purchase_source = clean(source);
        self.touch(now);
    }

    /// Set or clear the list price. Clearing re-derives the break-even price
    /// when the item has a cost, so a listing can't be left below cost by
    /// accident.
    pub fn set_list_price(&mut self, price: Option<Money>, now: DateTime<Utc>) -> DomainResult<()> {
        self.list_price = match price {
            Some(p) => {
                ensure_price("list price", p)?;
                Some(p)
            }
            None => Self::auto_list_price(self.purchase_price)?,
        };
        self.touch(now);
        Ok(())
    }

    /// Record the sale of this item. Recording a sale twice overwrites the
    /// previous figures (the user corrected a typo), it does not conflict.
    pub fn record_sale(
        &mut self,
        sold_price: Money,
        sold_date: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        ensure_price("sold price", sold_price)?;
        self.sold_price = Some(sold_price);
        self.sold_date = sold_date;
        self.touch(now);
        Ok(())
    }

    pub fn set_notes(&mut self, notes: Option<String>, now: DateTime<Utc>) {
        self.notes = clean(notes);
        self.touch(now);
    }

    pub fn set_photo_path(&mut self, path: Option<String>, now: DateTime<Utc>) {
        self.photo_path = clean(path);
        self.touch(now);
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn owner() -> UserId {
        UserId::new()
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn create_defaults_title_and_cost() {
        let item = Item::create(owner(), NewItem::default(), test_time()).unwrap();
        assert_eq!(item.title, "Untitled");
        assert_eq!(item.purchase_price, Money::ZERO);
        assert_eq!(item.list_price, None);
        assert_eq!(item.status(), ItemStatus::Listed);
    }

    #[test]
    fn create_rejects_negative_purchase_price() {
        let new = NewItem {
            title: "Denim jacket".into(),
            purchase_price: Some(money("-1.00")),
            ..NewItem::default()
        };
        let err = Item::create(owner(), new, test_time()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn create_autofills_break_even_list_price() {
        let new = NewItem {
            title: "Denim jacket".into(),
            purchase_price: Some(money("10.00")),
            ..NewItem::default()
        };
        let item = Item::create(owner(), new, test_time()).unwrap();
        assert_eq!(item.list_price, Some(money("12.95")));
    }

    #[test]
    fn create_keeps_explicit_list_price() {
        let new = NewItem {
            title: "Denim jacket".into(),
            purchase_price: Some(money("10.00")),
            list_price: Some(money("25.00")),
            ..NewItem::default()
        };
        let item = Item::create(owner(), new, test_time()).unwrap();
        assert_eq!(item.list_price, Some(money("25.00")));
    }

    #[test]
    fn clearing_list_price_re_derives_break_even() {
        let new = NewItem {
            title: "Denim jacket".into(),
            purchase_price: Some(money("50.00")),
            list_price: Some(money("80.00")),
            ..NewItem::default()
        };
        let mut item = Item::create(owner(), new, test_time()).unwrap();
        item.set_list_price(None, test_time()).unwrap();
        assert_eq!(item.list_price, Some(money("62.50")));
    }

    #[test]
    fn record_sale_flips_status_and_computes_profit() {
        let new = NewItem {
            title: "Denim jacket".into(),
            purchase_price: Some(money("10.00")),
            ..NewItem::default()
        };
        let mut item = Item::create(owner(), new, test_time()).unwrap();
        assert_eq!(item.status(), ItemStatus::Listed);

        item.record_sale(money("25.00"), None, test_time()).unwrap();
        assert_eq!(item.status(), ItemStatus::Sold);

        let econ = item.economics().unwrap();
        assert_eq!(econ.payout, Some(money("20.00")));
        assert_eq!(econ.profit, Some(money("10.00")));
        assert_eq!(econ.break_even_price, Some(money("12.95")));
    }

    #[test]
    fn economics_before_sale_has_no_payout() {
        let new = NewItem {
            title: "Denim jacket".into(),
            purchase_price: Some(money("10.00")),
            ..NewItem::default()
        };
        let item = Item::create(owner(), new, test_time()).unwrap();
        let econ = item.economics().unwrap();
        assert_eq!(econ.payout, None);
        assert_eq!(econ.profit, None);
        assert_eq!(econ.break_even_price, Some(money("12.95")));
    }

    #[test]
    fn economics_reports_losses() {
        let new = NewItem {
            title: "Denim jacket".into(),
            purchase_price: Some(money("10.00")),
            ..NewItem::default()
        };
        let mut item = Item::create(owner(), new, test_time()).unwrap();
        item.record_sale(money("5.00"), None, test_time()).unwrap();

        let econ = item.economics().unwrap();
        assert_eq!(econ.profit, Some(money("-7.95")));
    }

    #[test]
    fn free_item_has_no_break_even() {
        let item = Item::create(owner(), NewItem::default(), test_time()).unwrap();
        assert_eq!(item.economics().unwrap().break_even_price, None);
    }

    #[test]
    fn rename_rejects_blank_titles() {
        let mut item = Item::create(owner(), NewItem::default(), test_time()).unwrap();
        assert!(item.rename("   ", test_time()).is_err());
        item.rename("Wool coat", test_time()).unwrap();
        assert_eq!(item.title, "Wool coat");
    }
}
