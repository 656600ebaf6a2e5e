use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_catalog_tables::Migration),
            Box::new(m20240601_000002_create_clients_table::Migration),
            Box::new(m20240601_000003_create_dining_tables_table::Migration),
            Box::new(m20240601_000004_create_stock_tables::Migration),
            Box::new(m20240601_000005_create_orders_tables::Migration),
        ]
    }
}

fn id_col<T: IntoIden>(iden: T) -> ColumnDef {
    ColumnDef::new(iden)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn money_col<T: IntoIden>(iden: T) -> ColumnDef {
    ColumnDef::new(iden).decimal_len(12, 2).to_owned()
}

fn quantity_col<T: IntoIden>(iden: T) -> ColumnDef {
    ColumnDef::new(iden).decimal_len(14, 3).to_owned()
}

fn timestamp_col<T: IntoIden>(iden: T) -> ColumnDef {
    ColumnDef::new(iden).timestamp_with_time_zone().to_owned()
}

mod m20240601_000001_create_catalog_tables {
    use super::{id_col, money_col, timestamp_col};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000001_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(MenuGroups::Table)
                        .if_not_exists()
                        .col(id_col(MenuGroups::Id))
                        .col(ColumnDef::new(MenuGroups::Name).string().not_null())
                        .col(ColumnDef::new(MenuGroups::Description).string().null())
                        .col(
                            ColumnDef::new(MenuGroups::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(timestamp_col(MenuGroups::CreatedAt).not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(MenuItems::Table)
                        .if_not_exists()
                        .col(id_col(MenuItems::Id))
                        .col(ColumnDef::new(MenuItems::Name).string().not_null())
                        .col(ColumnDef::new(MenuItems::Description).string().null())
                        .col(money_col(MenuItems::Price).not_null())
                        .col(money_col(MenuItems::Cost).null())
                        .col(ColumnDef::new(MenuItems::GroupId).integer().null())
                        .col(ColumnDef::new(MenuItems::Barcode).string().null())
                        .col(
                            ColumnDef::new(MenuItems::Available)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(timestamp_col(MenuItems::CreatedAt).not_null())
                        .col(timestamp_col(MenuItems::UpdatedAt).not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_menu_items_group_id")
                        .table(MenuItems::Table)
                        .col(MenuItems::GroupId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_menu_items_barcode")
                        .table(MenuItems::Table)
                        .col(MenuItems::Barcode)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MenuItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(MenuGroups::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum MenuGroups {
        Table,
        Id,
        Name,
        Description,
        Active,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum MenuItems {
        Table,
        Id,
        Name,
        Description,
        Price,
        Cost,
        GroupId,
        Barcode,
        Available,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240601_000002_create_clients_table {
    use super::{id_col, timestamp_col};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000002_create_clients_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Clients::Table)
                        .if_not_exists()
                        .col(id_col(Clients::Id))
                        .col(ColumnDef::new(Clients::Name).string().not_null())
                        .col(ColumnDef::new(Clients::Phone).string().null())
                        .col(ColumnDef::new(Clients::Email).string().null())
                        .col(ColumnDef::new(Clients::Address).string().null())
                        .col(ColumnDef::new(Clients::Notes).string().null())
                        .col(
                            ColumnDef::new(Clients::OrderCount)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(timestamp_col(Clients::LastOrderAt).null())
                        .col(timestamp_col(Clients::CreatedAt).not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_clients_phone")
                        .table(Clients::Table)
                        .col(Clients::Phone)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Clients::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Clients {
        Table,
        Id,
        Name,
        Phone,
        Email,
        Address,
        Notes,
        OrderCount,
        LastOrderAt,
        CreatedAt,
    }
}

mod m20240601_000003_create_dining_tables_table {
    use super::{id_col, timestamp_col};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000003_create_dining_tables_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(DiningTables::Table)
                        .if_not_exists()
                        .col(id_col(DiningTables::Id))
                        .col(
                            ColumnDef::new(DiningTables::Number)
                                .integer()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(DiningTables::Capacity)
                                .integer()
                                .not_null()
                                .default(4),
                        )
                        .col(
                            ColumnDef::new(DiningTables::Status)
                                .string()
                                .not_null()
                                .default("livre"),
                        )
                        .col(ColumnDef::new(DiningTables::Location).string().null())
                        .col(timestamp_col(DiningTables::CreatedAt).not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(DiningTables::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum DiningTables {
        Table,
        Id,
        Number,
        Capacity,
        Status,
        Location,
        CreatedAt,
    }
}

mod m20240601_000004_create_stock_tables {
    use super::{id_col, money_col, quantity_col, timestamp_col};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000004_create_stock_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Suppliers::Table)
                        .if_not_exists()
                        .col(id_col(Suppliers::Id))
                        .col(ColumnDef::new(Suppliers::Name).string().not_null())
                        .col(ColumnDef::new(Suppliers::Document).string().null())
                        .col(ColumnDef::new(Suppliers::ContactName).string().null())
                        .col(ColumnDef::new(Suppliers::Phone).string().null())
                        .col(ColumnDef::new(Suppliers::Email).string().null())
                        .col(ColumnDef::new(Suppliers::Address).string().null())
                        .col(ColumnDef::new(Suppliers::Notes).string().null())
                        .col(timestamp_col(Suppliers::CreatedAt).not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(StockItems::Table)
                        .if_not_exists()
                        .col(id_col(StockItems::Id))
                        .col(ColumnDef::new(StockItems::Name).string().not_null())
                        .col(ColumnDef::new(StockItems::Unit).string().not_null())
                        .col(quantity_col(StockItems::Quantity).not_null().default(0))
                        .col(
                            quantity_col(StockItems::MinimumQuantity)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            quantity_col(StockItems::IdealQuantity)
                                .not_null()
                                .default(0),
                        )
                        .col(money_col(StockItems::UnitCost).null())
                        .col(ColumnDef::new(StockItems::SupplierId).integer().null())
                        .col(ColumnDef::new(StockItems::Barcode).string().null())
                        .col(ColumnDef::new(StockItems::Category).string().null())
                        .col(timestamp_col(StockItems::CreatedAt).not_null())
                        .col(timestamp_col(StockItems::UpdatedAt).not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_stock_items_barcode")
                        .table(StockItems::Table)
                        .col(StockItems::Barcode)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(StockMovements::Table)
                        .if_not_exists()
                        .col(id_col(StockMovements::Id))
                        .col(
                            ColumnDef::new(StockMovements::StockItemId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockMovements::Kind).string().not_null())
                        .col(quantity_col(StockMovements::Quantity).not_null())
                        .col(ColumnDef::new(StockMovements::Reason).string().null())
                        .col(timestamp_col(StockMovements::CreatedAt).not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_stock_movements_stock_item_id")
                        .table(StockMovements::Table)
                        .col(StockMovements::StockItemId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StockMovements::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(StockItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Suppliers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Suppliers {
        Table,
        Id,
        Name,
        Document,
        ContactName,
        Phone,
        Email,
        Address,
        Notes,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum StockItems {
        Table,
        Id,
        Name,
        Unit,
        Quantity,
        MinimumQuantity,
        IdealQuantity,
        UnitCost,
        SupplierId,
        Barcode,
        Category,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum StockMovements {
        Table,
        Id,
        StockItemId,
        Kind,
        Quantity,
        Reason,
        CreatedAt,
    }
}

mod m20240601_000005_create_orders_tables {
    use super::{id_col, money_col, timestamp_col};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240601_000005_create_orders_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(id_col(Orders::Id))
                        .col(
                            ColumnDef::new(Orders::Number)
                                .integer()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Orders::Kind).string().not_null())
                        .col(ColumnDef::new(Orders::Status).string().not_null())
                        .col(ColumnDef::new(Orders::TableId).integer().null())
                        .col(ColumnDef::new(Orders::ClientId).integer().null())
                        .col(ColumnDef::new(Orders::CustomerName).string().null())
                        .col(ColumnDef::new(Orders::DeliveryAddress).string().null())
                        .col(ColumnDef::new(Orders::Notes).string().null())
                        .col(money_col(Orders::Subtotal).not_null().default(0))
                        .col(money_col(Orders::Discount).not_null().default(0))
                        .col(money_col(Orders::ServiceFee).not_null().default(0))
                        .col(money_col(Orders::DeliveryFee).not_null().default(0))
                        .col(money_col(Orders::Total).not_null().default(0))
                        .col(ColumnDef::new(Orders::PaymentMethod).string().null())
                        .col(money_col(Orders::AmountPaid).null())
                        .col(money_col(Orders::ChangeDue).null())
                        .col(timestamp_col(Orders::CreatedAt).not_null())
                        .col(timestamp_col(Orders::UpdatedAt).not_null())
                        .col(timestamp_col(Orders::ClosedAt).null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_orders_status")
                        .table(Orders::Table)
                        .col(Orders::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_orders_table_id")
                        .table(Orders::Table)
                        .col(Orders::TableId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_orders_created_at")
                        .table(Orders::Table)
                        .col(Orders::CreatedAt)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(OrderItems::Table)
                        .if_not_exists()
                        .col(id_col(OrderItems::Id))
                        .col(ColumnDef::new(OrderItems::OrderId).integer().not_null())
                        .col(ColumnDef::new(OrderItems::MenuItemId).integer().not_null())
                        .col(ColumnDef::new(OrderItems::Name).string().not_null())
                        .col(ColumnDef::new(OrderItems::Quantity).integer().not_null())
                        .col(money_col(OrderItems::UnitPrice).not_null())
                        .col(money_col(OrderItems::Total).not_null())
                        .col(ColumnDef::new(OrderItems::Notes).string().null())
                        .col(timestamp_col(OrderItems::CreatedAt).not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_order_items_order_id")
                        .table(OrderItems::Table)
                        .col(OrderItems::OrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrderItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Orders {
        Table,
        Id,
        Number,
        Kind,
        Status,
        TableId,
        ClientId,
        CustomerName,
        DeliveryAddress,
        Notes,
        Subtotal,
        Discount,
        ServiceFee,
        DeliveryFee,
        Total,
        PaymentMethod,
        AmountPaid,
        ChangeDue,
        CreatedAt,
        UpdatedAt,
        ClosedAt,
    }

    #[derive(DeriveIden)]
    enum OrderItems {
        Table,
        Id,
        OrderId,
        MenuItemId,
        Name,
        Quantity,
        UnitPrice,
        Total,
        Notes,
        CreatedAt,
    }
}
