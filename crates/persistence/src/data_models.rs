// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;

use crate::diesel_schema::{draw_entries, entrants};

/// Diesel Insertable struct for entrant rows.
#[derive(Insertable)]
#[diesel(table_name = entrants)]
pub struct NewEntrantRow<'a> {
    pub period: &'a str,
    pub name: &'a str,
    pub name_key: &'a str,
    pub owner_handle: &'a str,
    pub added_at: String,
}

/// Diesel Queryable struct for entrant rows.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = entrants)]
pub struct EntrantRow {
    pub name: String,
    pub owner_handle: String,
    pub added_at: String,
}

/// Diesel Insertable struct for draw rows.
#[derive(Insertable)]
#[diesel(table_name = draw_entries)]
pub struct NewDrawEntryRow<'a> {
    pub period: &'a str,
    pub position: i32,
    pub name: &'a str,
    pub name_key: &'a str,
    pub selected: i32,
    pub crossed: i32,
}

/// Diesel Queryable struct for draw rows.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = draw_entries)]
pub struct DrawEntryRow {
    pub position: i32,
    pub name: String,
    pub selected: i32,
    pub crossed: i32,
}

/// Storage format of calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Encodes a calendar date for storage.
pub fn encode_date(date: chrono::NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Encodes a boolean flag for an `INTEGER` column.
pub fn encode_flag(flag: bool) -> i32 {
    i32::from(flag)
}
