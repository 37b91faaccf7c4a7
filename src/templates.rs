//! Sample catalog templates for testing and demonstration.
//!
//! Each template satisfies the page contract: it references `page_number` and
//! `total_pages` and repeats a region over `items`.

/// Full catalog page: header band, 3×3 product grid, footer.
pub fn catalog_template() -> &'static str {
    r##"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Product catalog</title>
    <style>
        @page { size: A4; margin: 0; }
        body { font-family: Arial, sans-serif; color: #333; margin: 0; }
        .header { background-color: #2d2d2d; color: white; padding: 30px 40px; }
        .header h1 { font-size: 36px; font-weight: normal; margin: 0; }
        .page-number { float: right; font-size: 28px; color: #0099cc; }
        .catalog-grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 16px; padding: 30px 40px; }
        .catalog-item { border: 1px solid #0099cc; border-radius: 12px; position: relative; padding: 12px; }
        .ribbon { position: absolute; top: 10px; left: -6px; background: #d32f2f; color: white; padding: 2px 10px; }
        .product-image img { max-width: 120px; max-height: 160px; }
        .price-box { background: #0099cc; color: white; font-weight: bold; padding: 4px 8px; }
        .regular-price { font-size: 11px; color: #777; }
        .promo-tag { color: #d32f2f; font-weight: bold; }
        .footer { text-align: center; font-size: 12px; color: #777; padding: 10px; }
    </style>
</head>
<body>
    <div class="header">
        <div class="page-number">{{ page_number }}</div>
        <h1>Very Special Offers</h1>
    </div>
    <div class="catalog-grid">
        {% for item in items %}
        <div class="catalog-item">
            {% if item.ribbon_flag %}
            <div class="ribbon">Special</div>
            {% endif %}
            <div class="product-image">
                <img src="{{ item.image_url }}" alt="{{ item.name }}">
            </div>
            <div class="product-details">
                <div class="box-info">{{ item.box_info }}</div>
                <div class="product-name">{{ item.name }}</div>
                <div class="product-variant">{{ item.variant }}</div>
                <div class="product-ref">Ref: {{ item.ref }}</div>
                <div class="price-section">
                    <div class="price-left">
                        <div class="price-box">{{ item.price }} €</div>
                        <div class="regular-price">{{ item.regular_price }} € Reg. Price</div>
                    </div>
                    <div class="promo-tag">{{ item.promo_tag }}</div>
                </div>
            </div>
        </div>
        {% endfor %}
    </div>
    <div class="footer">Page {{ page_number }} of {{ total_pages }}</div>
</body>
</html>
"##
}

/// Minimal template for unit testing: one line per product.
pub fn minimal_template() -> &'static str {
    r#"<h1>Page {{ page_number }} / {{ total_pages }}</h1>{% for item in items %}<p>{% if item.ribbon_flag %}[SPECIAL] {% endif %}{{ item.name }} {{ item.price }}</p>{% endfor %}"#
}
