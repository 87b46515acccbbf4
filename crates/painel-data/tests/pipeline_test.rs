//! End-to-end tests of the pipeline against CSV files on disk.

use approx::assert_relative_eq;
use painel_data::{
    DataError, JoinMode, MonthKey, PipelineCache, SourceConfig, SourceKind,
    aggregate_profit_by_product, columns, distinct_months, filter_by_month, load_all,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SALES_HEADER: &str =
    "id_venda,id_produto,id_cliente,id_vendedor,fornecedor_id,data,quantidade,preco_unitario,preco_total";

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

/// Writes a small but complete data set: six sales over three months.
fn fixture() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path();

    write(
        path,
        "fato_vendas.csv",
        &format!(
            "{SALES_HEADER}\n\
             1,10,100,7,55,2024-01-05,3,20.0,100.0\n\
             2,11,101,7,55,2024-01-20,1,35.5,40.0\n\
             3,10,101,8,56,2024-02-02,2,20.0,45.0\n\
             4,12,100,8,56,2024-02-14,5,4.0,20.0\n\
             5,11,100,7,55,2024-03-01,2,35.5,80.0\n\
             6,12,101,7,56,2024-03-31,10,4.0,38.0\n"
        ),
    );
    write(
        path,
        "dim_produtos.csv",
        "id_produto,nome_produto,categoria\n10,Caneta,Papelaria\n11,Mochila,Acessórios\n12,Borracha,Papelaria\n",
    );
    write(
        path,
        "dim_clientes.csv",
        "id_cliente,nome_cliente,estado,região\n100,Maria,SP,Sudeste\n101,João,BA,Nordeste\n",
    );
    write(
        path,
        "dim_vendedores.csv",
        "id_vendedor,nome_vendedor,estado\n7,Ana,SP\n8,Bruno,RJ\n",
    );
    write(
        path,
        "dim_fornecedores.csv",
        "fornecedor_id,nome_fornecedor\n55,Acme\n56,Globex\n",
    );

    dir
}

fn config(dir: &TempDir) -> SourceConfig {
    SourceConfig::default().with_data_dir(dir.path())
}

fn month(s: &str) -> MonthKey {
    s.parse().unwrap()
}

#[test]
fn test_load_all_joins_every_source() {
    let dir = fixture();
    let records = load_all(&config(&dir)).unwrap();

    assert_eq!(records.len(), 6);
    let frame = records.frame();
    for name in [
        columns::PRODUCT_NAME,
        columns::CATEGORY,
        columns::CUSTOMER_STATE,
        columns::SELLER_NAME,
        columns::MONTH,
        columns::PROFIT,
        "nome_cliente",
        "nome_fornecedor",
        "região",
        "id_venda",
    ] {
        assert!(frame.get_column_index(name).is_some(), "missing {name}");
    }
    // The customer state was renamed, so the seller's state keeps its name.
    assert!(frame.get_column_index("estado").is_some());
}

#[test]
fn test_load_all_is_deterministic() {
    let dir = fixture();
    let first = load_all(&config(&dir)).unwrap();
    let second = load_all(&config(&dir)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_timestamped_sales_bucket_by_month() {
    let dir = fixture();
    write(
        dir.path(),
        "fato_vendas.csv",
        &format!(
            "{SALES_HEADER}\n\
             1,10,100,7,55,2024-01-05 10:30:00,3,20.0,100.0\n\
             2,11,101,8,56,2024-02-07 08:00:00,1,35.5,40.0\n"
        ),
    );

    let records = load_all(&config(&dir)).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(
        distinct_months(&records).unwrap(),
        vec![month("2024-01"), month("2024-02")]
    );
}

#[test]
fn test_undated_sale_is_rejected() {
    let dir = fixture();
    write(
        dir.path(),
        "fato_vendas.csv",
        &format!(
            "{SALES_HEADER}\n\
             1,10,100,7,55,2024-01-05,3,20.0,100.0\n\
             2,11,101,8,56,,1,35.5,40.0\n"
        ),
    );

    // Every loaded record must fall into exactly one month.
    assert!(matches!(
        load_all(&config(&dir)),
        Err(DataError::Load {
            kind: SourceKind::Sales,
            ..
        })
    ));
}

#[test]
fn test_profit_formula() {
    let dir = fixture();
    let records = load_all(&config(&dir)).unwrap();

    // total_price=100, quantity=3, unit_price=20
    let profit = records
        .frame()
        .column(columns::PROFIT)
        .unwrap()
        .f64()
        .unwrap()
        .get(0)
        .unwrap();
    assert_relative_eq!(profit, 40.0);
}

#[test]
fn test_months_partition_records() {
    let dir = fixture();
    let records = load_all(&config(&dir)).unwrap();

    let months = distinct_months(&records).unwrap();
    assert_eq!(months, vec![month("2024-01"), month("2024-02"), month("2024-03")]);

    let mut seen = Vec::new();
    for m in &months {
        let subset = filter_by_month(&records, m).unwrap();
        assert!(!subset.is_empty());
        let ids = subset.frame().column("id_venda").unwrap().i64().unwrap();
        seen.extend(ids.into_no_null_iter());
    }

    // Union covers every record exactly once.
    seen.sort_unstable();
    assert_eq!(seen, vec![1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_filter_keeps_relative_order() {
    let dir = fixture();
    let records = load_all(&config(&dir)).unwrap();

    let march = filter_by_month(&records, &month("2024-03")).unwrap();
    let ids: Vec<i64> = march
        .frame()
        .column("id_venda")
        .unwrap()
        .i64()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert_eq!(ids, vec![5, 6]);
}

#[test]
fn test_aggregate_total_matches_profit_sum() {
    let dir = fixture();
    let records = load_all(&config(&dir)).unwrap();

    let profit = aggregate_profit_by_product(&records).unwrap();
    assert_eq!(profit.len(), 3);

    let total: f64 = profit.values().sum();
    assert_relative_eq!(total, records.total_profit().unwrap(), epsilon = 1e-9);
    // Caneta: (100 - 60) + (45 - 40)
    assert_relative_eq!(profit["Caneta"], 45.0, epsilon = 1e-9);
}

#[test]
fn test_unmatched_product_is_dropped() {
    let dir = fixture();
    write(
        dir.path(),
        "fato_vendas.csv",
        &format!(
            "{SALES_HEADER}\n\
             1,10,100,7,55,2024-01-05,3,20.0,100.0\n\
             2,99,100,7,55,2024-01-06,1,1.0,1.0\n\
             3,11,101,8,56,2024-02-02,2,35.5,80.0\n"
        ),
    );

    let records = load_all(&config(&dir)).unwrap();
    assert_eq!(records.len(), 2);

    let left = load_all(&config(&dir).with_join_mode(JoinMode::Left)).unwrap();
    assert_eq!(left.len(), 3);
    assert_eq!(
        left.frame()
            .column(columns::PRODUCT_NAME)
            .unwrap()
            .null_count(),
        1
    );
}

#[test]
fn test_empty_month_is_not_an_error() {
    let dir = fixture();
    let records = load_all(&config(&dir)).unwrap();

    let empty = filter_by_month(&records, &month("1999-01")).unwrap();
    assert!(empty.is_empty());
    assert!(aggregate_profit_by_product(&empty).unwrap().is_empty());
}

#[test]
fn test_missing_source_file() {
    let dir = fixture();
    fs::remove_file(dir.path().join("dim_fornecedores.csv")).unwrap();

    let err = load_all(&config(&dir)).unwrap_err();
    assert!(matches!(
        err,
        DataError::Load {
            kind: SourceKind::Supplier,
            ..
        }
    ));
}

#[test]
fn test_missing_join_key_column() {
    let dir = fixture();
    write(
        dir.path(),
        "dim_clientes.csv",
        "codigo,estado\n100,SP\n",
    );

    let err = load_all(&config(&dir)).unwrap_err();
    match err {
        DataError::Schema { kind, column } => {
            assert_eq!(kind, SourceKind::Customer);
            assert_eq!(column, "id_cliente");
        }
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn test_custom_column_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path();
    write(
        path,
        "sales.csv",
        "product,customer,seller,supplier,day,qty,price,total\n1,1,1,1,05/01/2024,2,3.0,7.0\n",
    );
    write(path, "products.csv", "product,name,kind\n1,Lamp,Home\n");
    write(path, "customers.csv", "customer,uf\n1,PR\n");
    write(path, "sellers.csv", "seller,who\n1,Caio\n");
    write(path, "suppliers.csv", "supplier\n1\n");

    let toml = path.join("painel.toml");
    fs::write(
        &toml,
        r#"
date_format = "%d/%m/%Y"

[files]
sales = "sales.csv"
products = "products.csv"
customers = "customers.csv"
sellers = "sellers.csv"
suppliers = "suppliers.csv"

[columns]
product_id = "product"
customer_id = "customer"
seller_id = "seller"
supplier_id = "supplier"
date = "day"
quantity = "qty"
unit_price = "price"
total_price = "total"
product_name = "name"
category = "kind"
customer_state = "uf"
seller_name = "who"
"#,
    )
    .unwrap();

    let config = SourceConfig::load(Some(toml.as_path())).unwrap().with_data_dir(path);
    let records = load_all(&config).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(distinct_months(&records).unwrap(), vec![month("2024-01")]);
    assert_relative_eq!(records.total_profit().unwrap(), 1.0);
}

#[test]
fn test_cache_reuses_until_sources_change() {
    let dir = fixture();
    let config = config(&dir);
    let cache = PipelineCache::new();

    let first = cache.get_or_load(&config).unwrap();
    let second = cache.get_or_load(&config).unwrap();
    assert_eq!(cache.loads(), 1);
    assert_eq!(first, second);

    // Appending a row changes the file length, hence the fingerprint.
    let sales = dir.path().join("fato_vendas.csv");
    let mut contents = fs::read_to_string(&sales).unwrap();
    contents.push_str("7,10,100,7,55,2024-04-01,1,20.0,25.0\n");
    fs::write(&sales, contents).unwrap();

    let third = cache.get_or_load(&config).unwrap();
    assert_eq!(cache.loads(), 2);
    assert_eq!(third.len(), 7);

    cache.invalidate();
    cache.get_or_load(&config).unwrap();
    assert_eq!(cache.loads(), 3);
}

#[test]
fn test_concurrent_misses_share_one_load() {
    let dir = fixture();
    let config = config(&dir);
    let cache = PipelineCache::new();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| cache.get_or_load(&config).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().len(), 6);
        }
    });

    assert_eq!(cache.loads(), 1);
}

#[test]
fn test_cache_propagates_load_errors() {
    let dir = tempfile::tempdir().unwrap();
    let cache = PipelineCache::new();

    assert!(cache.get_or_load(&config(&dir)).is_err());
    assert_eq!(cache.loads(), 0);
}
