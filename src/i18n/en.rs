use super::{
    BuybackStrings, CatalogStrings, CommonStrings, ErrorStrings, NotificationStrings, Translation,
    ValidationStrings,
};

const CATALOG: CatalogStrings = CatalogStrings {
    all_categories: "All categories",
    search_placeholder: "Search by name or article number",
    no_results: "No products match your search",
    select_condition: "Select the condition of your item",
    condition_like_new: "Like new",
    condition_very_good: "Very good",
    condition_well_used: "Well used",
    price: "Buyback price",
    member_price: "IKEA Family price",
    add_to_list: "Add to buyback list",
};

const BUYBACK: BuybackStrings = BuybackStrings {
    list_title: "Your buyback list",
    article_number_column: "Article number",
    product_column: "Product",
    condition_column: "Condition",
    empty_list: "Your buyback list is empty",
    item_count: "{count} items",
    quantity: "Quantity",
    total_value: "Estimated value",
    family_total_value: "Estimated IKEA Family value",
    remove_item: "Remove",
    clear_list: "Clear list",
    email_label: "Email address",
    store_label: "Store",
    consent_label: "I agree to the buyback terms and conditions",
    submit: "Get my quotation",
    submitting: "Submitting...",
    confirmation_title: "Thank you! Your quotation is ready",
    confirmation_number: "Confirmation number",
};

const ERRORS: ErrorStrings = ErrorStrings {
    network: "Unable to connect. Please check your internet connection.",
    bad_request: "The request was invalid. Please check your details and try again.",
    unauthorized: "Please sign in to continue.",
    forbidden: "You do not have permission to do that.",
    not_found: "We could not find what you were looking for.",
    server: "Something went wrong on our side. Please try again later.",
    unavailable: "The service is temporarily unavailable. Please try again shortly.",
    submission_rejected: "Your buyback request could not be accepted. Please try again.",
    generic: "An unexpected error occurred (status {status}).",
};

const VALIDATION: ValidationStrings = ValidationStrings {
    empty_list: "Add at least one item before submitting.",
    invalid_email: "Please enter a valid email address.",
    store_required: "Please select a store.",
    consent_required: "Please accept the terms and conditions.",
    condition_unavailable: "This condition is not available for this product.",
};

const NOTIFICATIONS: NotificationStrings = NotificationStrings {
    item_added: "Item added to your buyback list",
    item_removed: "Item removed from your buyback list",
    list_cleared: "Your buyback list has been cleared",
    submission_success: "Your buyback request has been submitted",
    clear_list_title: "Clear your list?",
    clear_list_message: "All items will be removed from your buyback list.",
    ok: "OK",
    cancel: "Cancel",
};

pub(super) static EN_SA: Translation = Translation {
    common: CommonStrings {
        app_title: "IKEA Buyback",
        market_name: "Saudi Arabia",
        currency_name: "Saudi riyal",
        switch_language: "العربية",
        back: "Back",
        close: "Close",
        cancel: "Cancel",
        confirm: "Confirm",
        loading: "Loading...",
    },
    catalog: CATALOG,
    buyback: BUYBACK,
    errors: ERRORS,
    validation: VALIDATION,
    notifications: NOTIFICATIONS,
};

pub(super) static EN_BH: Translation = Translation {
    common: CommonStrings {
        app_title: "IKEA Buyback",
        market_name: "Bahrain",
        currency_name: "Bahraini dinar",
        switch_language: "العربية",
        back: "Back",
        close: "Close",
        cancel: "Cancel",
        confirm: "Confirm",
        loading: "Loading...",
    },
    catalog: CATALOG,
    buyback: BUYBACK,
    errors: ERRORS,
    validation: VALIDATION,
    notifications: NOTIFICATIONS,
};
