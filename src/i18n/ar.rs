use super::{
    BuybackStrings, CatalogStrings, CommonStrings, ErrorStrings, NotificationStrings, Translation,
    ValidationStrings,
};

const CATALOG: CatalogStrings = CatalogStrings {
    all_categories: "جميع الفئات",
    search_placeholder: "ابحث بالاسم أو رقم المنتج",
    no_results: "لا توجد منتجات مطابقة لبحثك",
    select_condition: "اختر حالة المنتج",
    condition_like_new: "كالجديد",
    condition_very_good: "جيد جداً",
    condition_well_used: "مستخدم بكثرة",
    price: "سعر إعادة الشراء",
    member_price: "سعر أعضاء ايكيا فاميلي",
    add_to_list: "أضف إلى قائمة إعادة الشراء",
};

const BUYBACK: BuybackStrings = BuybackStrings {
    list_title: "قائمة إعادة الشراء",
    article_number_column: "رقم المنتج",
    product_column: "المنتج",
    condition_column: "الحالة",
    empty_list: "قائمة إعادة الشراء فارغة",
    item_count: "{count} منتجات",
    quantity: "الكمية",
    total_value: "القيمة التقديرية",
    family_total_value: "القيمة التقديرية لأعضاء ايكيا فاميلي",
    remove_item: "إزالة",
    clear_list: "مسح القائمة",
    email_label: "البريد الإلكتروني",
    store_label: "المتجر",
    consent_label: "أوافق على شروط وأحكام إعادة الشراء",
    submit: "احصل على عرض السعر",
    submitting: "جارٍ الإرسال...",
    confirmation_title: "شكراً لك! عرض السعر جاهز",
    confirmation_number: "رقم التأكيد",
};

const ERRORS: ErrorStrings = ErrorStrings {
    network: "تعذر الاتصال. يرجى التحقق من اتصالك بالإنترنت.",
    bad_request: "الطلب غير صالح. يرجى التحقق من بياناتك والمحاولة مرة أخرى.",
    unauthorized: "يرجى تسجيل الدخول للمتابعة.",
    forbidden: "ليس لديك صلاحية للقيام بذلك.",
    not_found: "لم نتمكن من العثور على ما تبحث عنه.",
    server: "حدث خطأ من جانبنا. يرجى المحاولة لاحقاً.",
    unavailable: "الخدمة غير متاحة مؤقتاً. يرجى المحاولة بعد قليل.",
    submission_rejected: "تعذر قبول طلب إعادة الشراء. يرجى المحاولة مرة أخرى.",
    generic: "حدث خطأ غير متوقع (الحالة {status}).",
};

const VALIDATION: ValidationStrings = ValidationStrings {
    empty_list: "أضف منتجاً واحداً على الأقل قبل الإرسال.",
    invalid_email: "يرجى إدخال بريد إلكتروني صالح.",
    store_required: "يرجى اختيار متجر.",
    consent_required: "يرجى الموافقة على الشروط والأحكام.",
    condition_unavailable: "هذه الحالة غير متاحة لهذا المنتج.",
};

const NOTIFICATIONS: NotificationStrings = NotificationStrings {
    item_added: "تمت إضافة المنتج إلى قائمة إعادة الشراء",
    item_removed: "تمت إزالة المنتج من قائمة إعادة الشراء",
    list_cleared: "تم مسح قائمة إعادة الشراء",
    submission_success: "تم إرسال طلب إعادة الشراء",
    clear_list_title: "مسح القائمة؟",
    clear_list_message: "ستتم إزالة جميع المنتجات من قائمة إعادة الشراء.",
    ok: "حسناً",
    cancel: "إلغاء",
};

pub(super) static AR_SA: Translation = Translation {
    common: CommonStrings {
        app_title: "إعادة الشراء من ايكيا",
        market_name: "المملكة العربية السعودية",
        currency_name: "ريال سعودي",
        switch_language: "English",
        back: "رجوع",
        close: "إغلاق",
        cancel: "إلغاء",
        confirm: "تأكيد",
        loading: "جارٍ التحميل...",
    },
    catalog: CATALOG,
    buyback: BUYBACK,
    errors: ERRORS,
    validation: VALIDATION,
    notifications: NOTIFICATIONS,
};

pub(super) static AR_BH: Translation = Translation {
    common: CommonStrings {
        app_title: "إعادة الشراء من ايكيا",
        market_name: "البحرين",
        currency_name: "دينار بحريني",
        switch_language: "English",
        back: "رجوع",
        close: "إغلاق",
        cancel: "إلغاء",
        confirm: "تأكيد",
        loading: "جارٍ التحميل...",
    },
    catalog: CATALOG,
    buyback: BUYBACK,
    errors: ERRORS,
    validation: VALIDATION,
    notifications: NOTIFICATIONS,
};
