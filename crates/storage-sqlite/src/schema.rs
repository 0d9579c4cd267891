// Diesel table definitions. Decimals and dates are TEXT columns.

diesel::table! {
    fixed_deposits (id) {
        id -> BigInt,
        name -> Text,
        invested_amount -> Text,
        interest_rate -> Text,
        start_date -> Text,
        maturity_date -> Text,
        status -> Text,
        actual_withdrawal -> Nullable<Text>,
        closed_date -> Nullable<Text>,
        notes -> Nullable<Text>,
        created_at -> Text,
    }
}

diesel::table! {
    mutual_funds (id) {
        id -> BigInt,
        name -> Text,
        scheme_code -> Nullable<Text>,
        sip_amount -> Nullable<Text>,
        start_date -> Text,
        total_units -> Text,
        current_nav -> Text,
        last_nav_date -> Nullable<Text>,
        total_invested -> Text,
        status -> Text,
        redeemed_amount -> Nullable<Text>,
        redeemed_date -> Nullable<Text>,
        notes -> Nullable<Text>,
        created_at -> Text,
    }
}

diesel::table! {
    mutual_fund_installments (id) {
        id -> BigInt,
        fund_id -> BigInt,
        date -> Text,
        amount -> Text,
        nav_at_purchase -> Text,
        units -> Text,
        kind -> Text,
    }
}

diesel::table! {
    recurring_deposits (id) {
        id -> BigInt,
        name -> Text,
        installment_amount -> Text,
        frequency -> Text,
        frequency_days -> Nullable<Integer>,
        interest_rate -> Text,
        start_date -> Text,
        total_installments -> Integer,
        installments_paid -> Integer,
        last_paid_date -> Nullable<Text>,
        status -> Text,
        actual_withdrawal -> Nullable<Text>,
        closed_date -> Nullable<Text>,
        notes -> Nullable<Text>,
        created_at -> Text,
    }
}

diesel::table! {
    tradable_positions (id) {
        id -> BigInt,
        name -> Text,
        symbol -> Text,
        lookup_id -> Nullable<Text>,
        market -> Text,
        quantity -> Text,
        buy_price -> Text,
        buy_date -> Text,
        current_price -> Text,
        status -> Text,
        sell_price -> Nullable<Text>,
        sell_date -> Nullable<Text>,
        notes -> Nullable<Text>,
        created_at -> Text,
    }
}

diesel::table! {
    app_settings (setting_key) {
        setting_key -> Text,
        setting_value -> Text,
    }
}

diesel::table! {
    expense_tags (id) {
        id -> BigInt,
        name -> Text,
        color -> Nullable<Text>,
    }
}

diesel::table! {
    expenses (id) {
        id -> BigInt,
        amount -> Text,
        date -> Text,
        category_tag_id -> Nullable<BigInt>,
        description -> Nullable<Text>,
    }
}

diesel::table! {
    expense_exclusion_tags (expense_id, tag_id) {
        expense_id -> BigInt,
        tag_id -> BigInt,
    }
}

diesel::table! {
    cash_accounts (id) {
        id -> BigInt,
        name -> Text,
        balance -> Text,
        currency -> Text,
    }
}

diesel::table! {
    other_assets (id) {
        id -> BigInt,
        name -> Text,
        value -> Text,
    }
}

diesel::table! {
    savings_goals (id) {
        id -> BigInt,
        name -> Text,
        target_amount -> Text,
        saved_amount -> Text,
    }
}

diesel::joinable!(mutual_fund_installments -> mutual_funds (fund_id));
diesel::joinable!(expenses -> expense_tags (category_tag_id));
diesel::joinable!(expense_exclusion_tags -> expenses (expense_id));
diesel::joinable!(expense_exclusion_tags -> expense_tags (tag_id));

diesel::allow_tables_to_appear_in_same_query!(
    fixed_deposits,
    mutual_funds,
    mutual_fund_installments,
    recurring_deposits,
    tradable_positions,
    app_settings,
    expense_tags,
    expenses,
    expense_exclusion_tags,
    cash_accounts,
    other_assets,
    savings_goals,
);
